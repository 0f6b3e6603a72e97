//! Error types shared across Cutline crates.

use std::path::PathBuf;

/// The one message shown to the user when an export fails.
///
/// Details go to the log; the user only ever sees this.
pub const EXPORT_FAILURE_ALERT: &str = "Error processing video. See console for details.";

/// Top-level error type for Cutline operations.
#[derive(Debug, thiserror::Error)]
pub enum CutlineError {
    #[error("Media error: {message}")]
    Media { message: String },

    #[error("Frame capture error: {message}")]
    Capture { message: String },

    #[error("Transcoder error: {message}")]
    Transcode { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    /// The resource an operation needs is missing or degenerate
    /// (engine not loaded, no media, zero-length range).
    #[error("Not ready: {message}")]
    NotReady { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CutlineError.
pub type CutlineResult<T> = Result<T, CutlineError>;

impl CutlineError {
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error means "refuse silently" rather than "tell the user".
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// Text suitable for a user-facing alert.
    pub fn user_message(&self) -> &'static str {
        EXPORT_FAILURE_ALERT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_classification() {
        assert!(CutlineError::not_ready("engine not loaded").is_not_ready());
        assert!(!CutlineError::transcode("exit 1").is_not_ready());
    }

    #[test]
    fn test_display_includes_message() {
        let err = CutlineError::export("No output data");
        assert_eq!(err.to_string(), "Export error: No output data");
        assert_eq!(err.user_message(), EXPORT_FAILURE_ALERT);
    }
}
