use thiserror::Error;

#[derive(Debug, Error)]
pub enum LucroRealError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LucroRealError {
    fn from(e: serde_json::Error) -> Self {
        LucroRealError::SerializationError(e.to_string())
    }
}
