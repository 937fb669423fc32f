//! Error types for risk evaluation

/// Errors raised before any score is produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    /// A field of the input record is outside its declared domain
    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl ScoreError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoreError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Alias for Result with `ScoreError`
pub type Result<T> = std::result::Result<T, ScoreError>;
