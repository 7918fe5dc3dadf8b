pub mod csv_out;
pub mod minimal;
pub mod table;

use lucro_real_core::config::DiagnosisConfig;
use serde_json::Value;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, config: Option<&DiagnosisConfig>) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => {
            let default_config = DiagnosisConfig::default();
            table::print_table(value, config.unwrap_or(&default_config));
        }
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Nested objects become dotted keys (`snapshot.real_profit`); arrays stay whole.
pub(crate) fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}

/// The `alerts` array of an alert report or diagnosis, if the result has one.
pub(crate) fn find_alerts(result: &Value) -> Option<&Vec<Value>> {
    result
        .get("alerts")
        .and_then(|a| a.as_array().or_else(|| a.get("alerts")?.as_array()))
}

/// Render a scalar for a text cell.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
