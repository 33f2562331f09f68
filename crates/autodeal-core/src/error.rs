use thiserror::Error;

/// Errors returned by the calculators and the rate table.
///
/// Unusual-but-computable deals (negative equity, overpayment, long terms)
/// are never errors; they come back as warnings on the output envelope.
#[derive(Debug, Error)]
pub enum AutoDealError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// The embedded rate table failed to parse.
    #[error("Rate table unavailable: {0}")]
    RateTable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AutoDealError {
    fn from(e: serde_json::Error) -> Self {
        AutoDealError::SerializationError(e.to_string())
    }
}
