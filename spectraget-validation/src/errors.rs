// Validation errors

use thiserror::Error;

/// HTTP status attached to every validation failure
pub const VALIDATION_STATUS_CODE: u16 = 400;

/// The first constraint violation found in a request payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationFailure {
    /// Human-readable description of the violation
    pub message: String,

    /// HTTP status code, always 400
    pub status_code: u16,
}

impl ValidationFailure {
    /// Create a new validation failure
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: VALIDATION_STATUS_CODE,
        }
    }

    /// Split into message and status code
    pub fn into_parts(self) -> (String, u16) {
        (self.message, self.status_code)
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.message,
            "status_code": self.status_code,
        })
    }
}

/// Errors raised while building or loading a schema.
///
/// These signal a broken schema rather than bad user input, so they are
/// never turned into a [`ValidationFailure`].
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Duplicate parameter in schema: {0}")]
    DuplicateParameter(String),

    #[error("Invalid regex for parameter {parameter}: {source}")]
    InvalidRegex {
        parameter: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to load schema: {0}")]
    Load(String),

    #[error("Failed to parse schema: {0}")]
    Parse(String),

    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
