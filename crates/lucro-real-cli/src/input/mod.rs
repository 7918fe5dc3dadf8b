pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a command's input from `--input <file>`, else from piped stdin.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_structured(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => {
            log::debug!("reading {} from stdin", what);
            Ok(Some(serde_json::from_value(value)?))
        }
        None => Ok(None),
    }
}

/// Like [`load`] but the input is mandatory.
pub fn require<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    load(path, what)?.ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}
