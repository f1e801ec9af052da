//! Analysis errors.

use crate::transcript::ParseError;

/// Error type for [`analyze`](super::analyze).
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The transcript has nothing to analyze.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The configured apology words do not form a valid pattern.
    #[error("Invalid apology words '{words}': {reason}")]
    InvalidPattern { words: String, reason: String },
}

impl AnalysisError {
    /// Whether the error was caused by the uploaded transcript itself
    /// rather than by the analyzer's configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AnalysisError::Parse(_))
    }
}
