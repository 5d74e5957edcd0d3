//! Error taxonomy for a text lookup.

use thiserror::Error;

use crate::capture::ShellError;

/// Why a lookup did not produce text.
#[derive(Debug, Error)]
pub enum LookupError {
    /// A desktop collaborator failed or returned unavailable data.
    #[error("{0}")]
    Transport(String),

    /// The capture area around the pointer is below the minimum size.
    #[error("Too marginal. (>_<)")]
    TooMarginal,

    /// Detection or selection produced no candidate rectangle.
    #[error("OCR preprocess failed. (~_~)")]
    Preprocess,

    /// Recognition ran but nothing usable came back.
    #[error("OCR process failed. (-_-;)")]
    NoText,

    /// The OCR engine itself failed.
    #[error("{0}")]
    Engine(#[from] anyhow::Error),

    /// The captured screenshot could not be read.
    #[error("Failed to read screenshot: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The user dismissed the area selection.
    #[error("Operation was cancelled")]
    Cancelled,
}

/// Coarse classification of a [`LookupError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    TooMarginal,
    Preprocess,
    Recognition,
    Cancelled,
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::Transport(_) | LookupError::Image(_) | LookupError::Io(_) => {
                FailureKind::Transport
            }
            LookupError::TooMarginal => FailureKind::TooMarginal,
            LookupError::Preprocess => FailureKind::Preprocess,
            LookupError::NoText | LookupError::Engine(_) => FailureKind::Recognition,
            LookupError::Cancelled => FailureKind::Cancelled,
        }
    }
}

impl From<ShellError> for LookupError {
    fn from(err: ShellError) -> Self {
        match err {
            ShellError::Cancelled => LookupError::Cancelled,
            other => LookupError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_cancel_maps_to_cancelled() {
        let err: LookupError = ShellError::Cancelled.into();
        assert_eq!(err.kind(), FailureKind::Cancelled);
    }

    #[test]
    fn test_shell_failure_keeps_message() {
        let err: LookupError = ShellError::Failed("Screenshot failed".to_string()).into();
        assert_eq!(err.kind(), FailureKind::Transport);
        assert_eq!(err.to_string(), "Screenshot failed");
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(LookupError::TooMarginal.to_string(), "Too marginal. (>_<)");
        assert_eq!(LookupError::Preprocess.to_string(), "OCR preprocess failed. (~_~)");
        assert_eq!(LookupError::NoText.to_string(), "OCR process failed. (-_-;)");
    }
}
