use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AgFinanceError {
    /// Shorthand for the common validation failure.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AgFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AgFinanceError {
    fn from(e: serde_json::Error) -> Self {
        AgFinanceError::SerializationError(e.to_string())
    }
}
