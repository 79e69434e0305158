use std::fmt;
use tokio_util::sync::CancellationToken;

/// Errors that abort a cleanup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupError {
    /// The caller cancelled the run
    Cancelled,
    /// A stage gave up; raised by stages and passed through unchanged
    StageFailed { stage: String, message: String },
    /// A span marker annotation could not be decoded
    MalformedMarker(String),
    /// A configured stage name is not registered
    UnknownStage(String),
}

impl CleanupError {
    pub fn stage_failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        CleanupError::StageFailed {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CleanupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupError::Cancelled => write!(f, "Cleanup cancelled"),
            CleanupError::StageFailed { stage, message } => {
                write!(f, "Stage '{stage}' failed: {message}")
            }
            CleanupError::MalformedMarker(data) => write!(f, "Malformed span marker: {data:?}"),
            CleanupError::UnknownStage(name) => write!(f, "Stage '{name}' not found"),
        }
    }
}

impl std::error::Error for CleanupError {}

/// `Err(Cancelled)` once `cancellation` has fired
pub fn check_cancelled(cancellation: &CancellationToken) -> Result<(), CleanupError> {
    if cancellation.is_cancelled() {
        Err(CleanupError::Cancelled)
    } else {
        Ok(())
    }
}
