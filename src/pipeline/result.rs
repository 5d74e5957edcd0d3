//! The outcome of one lookup and its signaling parameters.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::capture::Signal;
use crate::error::{FailureKind, LookupError};
use crate::geometry::Rectangle;

/// Process exit status for a cancelled lookup.
pub const EXIT_CANCELLED: i32 = 125;

/// Style used for every error display.
const ERROR_STYLE: &str = "display";

/// How the shell extension presents the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Auto,
    Swift,
    Popup,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Auto => "auto",
            Style::Swift => "swift",
            Style::Popup => "popup",
        }
    }
}

/// Recognized text and where it was found, in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Found {
    pub text: String,
    pub area: Rectangle,
}

/// Result of one invocation.
///
/// Exactly one of three shapes: text with an area, an error message without
/// either, or cancelled. Quiet mode may additionally mark an error as
/// cancelled, keeping the message for the log.
#[derive(Clone, Debug, PartialEq)]
pub struct Lookup {
    pub text: Option<String>,
    pub area: Option<Rectangle>,
    pub error: Option<String>,
    pub cancelled: bool,
    pub style: String,
}

impl Lookup {
    fn empty() -> Self {
        Self {
            text: None,
            area: None,
            error: None,
            cancelled: false,
            style: Style::default().as_str().to_string(),
        }
    }

    pub fn found(found: Found) -> Self {
        Self {
            text: Some(found.text),
            area: Some(found.area),
            ..Self::empty()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::empty()
        }
    }

    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::empty()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.text.is_none()
    }

    /// Sets the style, suffixed with `:name` when a name is given.
    pub fn set_style(&mut self, style: Style, name: &str) {
        self.style = if name.is_empty() {
            style.as_str().to_string()
        } else {
            format!("{}:{}", style.as_str(), name)
        };
    }

    /// In quiet mode an error is folded into cancellation. The message is kept.
    pub fn set_quiet(&mut self, quiet: bool) {
        if quiet && !self.cancelled && self.is_error() {
            crate::log(&format!(
                "Quiet mode, suppressing: {}",
                self.error.as_deref().unwrap_or("no text")
            ));
            self.cancelled = true;
        }
    }

    /// Parameters for the shell's `Run` call.
    pub fn signal(&self) -> Signal {
        let area = self.area.map(|r| r.area());
        match (&self.error, &self.text) {
            (None, Some(text)) => Signal {
                style: self.style.clone(),
                text: text.trim().to_string(),
                info: String::new(),
                area,
            },
            (error, _) => Signal {
                style: ERROR_STYLE.to_string(),
                text: String::new(),
                info: error
                    .clone()
                    .unwrap_or_else(|| LookupError::NoText.to_string()),
                area,
            },
        }
    }
}

impl From<LookupError> for Lookup {
    fn from(err: LookupError) -> Self {
        match err.kind() {
            FailureKind::Cancelled => {
                crate::log("Lookup cancelled");
                Self::cancelled()
            }
            kind => {
                crate::log(&format!("Lookup failed ({:?}): {}", kind, err));
                Self::failed(err.to_string())
            }
        }
    }
}

impl From<Result<Found, LookupError>> for Lookup {
    fn from(outcome: Result<Found, LookupError>) -> Self {
        match outcome {
            Ok(found) => {
                crate::log(&format!(
                    "Recognized {} char(s) at ({}, {}, {}x{})",
                    found.text.chars().count(),
                    found.area.x,
                    found.area.y,
                    found.area.width,
                    found.area.height
                ));
                Self::found(found)
            }
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Area;

    fn hello() -> Lookup {
        Lookup::found(Found {
            text: "hello ".to_string(),
            area: Rectangle::whole(Area::new(10, 20, 30, 40)),
        })
    }

    #[test]
    fn test_success_signal() {
        let mut lookup = hello();
        lookup.set_style(Style::Swift, "google");

        let signal = lookup.signal();
        assert_eq!(signal.style, "swift:google");
        assert_eq!(signal.text, "hello");
        assert_eq!(signal.info, "");
        assert_eq!(signal.area, Some(Area::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_error_signal_uses_display_style() {
        let mut lookup: Lookup = LookupError::Preprocess.into();
        lookup.set_style(Style::Popup, "");

        let signal = lookup.signal();
        assert_eq!(signal.style, "display");
        assert_eq!(signal.text, "");
        assert_eq!(signal.info, "OCR preprocess failed. (~_~)");
        assert_eq!(signal.area, None);
    }

    #[test]
    fn test_cancellation_is_not_an_error_message() {
        let lookup: Lookup = LookupError::Cancelled.into();
        assert!(lookup.cancelled);
        assert_eq!(lookup.error, None);
        assert_eq!(lookup.text, None);
        assert_eq!(lookup.area, None);
    }

    #[test]
    fn test_quiet_folds_errors_only() {
        let mut failed: Lookup = LookupError::TooMarginal.into();
        failed.set_quiet(true);
        assert!(failed.cancelled);
        assert_eq!(failed.error.as_deref(), Some("Too marginal. (>_<)"));

        let mut ok = hello();
        ok.set_quiet(true);
        assert!(!ok.cancelled);

        let mut loud: Lookup = LookupError::NoText.into();
        loud.set_quiet(false);
        assert!(!loud.cancelled);
    }

    #[test]
    fn test_default_style() {
        assert_eq!(hello().style, "auto");
    }
}
