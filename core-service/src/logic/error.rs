//! Error types shared by every engine in the core.

use thiserror::Error;

use super::history::HistoryError;

pub type CardioResult<T> = Result<T, CardioError>;

#[derive(Debug, Error)]
pub enum CardioError {
    /// Artifact missing or corrupt; the process must not serve predictions.
    #[error("startup error: {0}")]
    Startup(String),

    /// Malformed or out-of-range user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Encoded vector disagrees with what the model was trained on.
    #[error("schema mismatch: expected {expected} features, got {actual} ({detail})")]
    SchemaMismatch {
        expected: usize,
        actual: usize,
        detail: String,
    },

    #[error("explanations are disabled")]
    ExplainDisabled,

    #[error(transparent)]
    History(#[from] HistoryError),
}

impl CardioError {
    pub fn startup(msg: impl Into<String>) -> Self {
        CardioError::Startup(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CardioError::Validation(msg.into())
    }
}
