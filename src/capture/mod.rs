//! Desktop collaborators: screen capture, area selection, pointer/window
//! geometry and the final notification.
//!
//! This module provides:
//! - The collaborator traits the pipeline is written against
//! - Scoped temporary screenshots (`screenshot`)
//! - The GNOME Shell implementation over the session bus (`gnome`)

pub mod gnome;
pub mod screenshot;

pub use gnome::GnomeShell;
pub use screenshot::take_screenshot;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::{Area, Point};

#[derive(Debug, Error)]
pub enum ShellError {
    /// The shell reported a failure with its own message.
    #[error("{0}")]
    Failed(String),

    /// A queried property was missing or malformed.
    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    /// The user cancelled an interactive request.
    #[error("Operation was cancelled")]
    Cancelled,

    #[error("D-Bus error: {0}")]
    Bus(#[from] zbus::Error),
}

/// Writes screenshots to a caller-provided PNG path.
///
/// On success returns the path actually written, which may differ from `dest`.
pub trait ScreenCapture {
    fn capture_area(&self, area: Area, dest: &Path) -> Result<PathBuf, ShellError>;
    fn capture_window(&self, dest: &Path) -> Result<PathBuf, ShellError>;
    fn capture_fullscreen(&self, dest: &Path) -> Result<PathBuf, ShellError>;
}

/// Interactive area selection. A dismissed selection is [`ShellError::Cancelled`].
pub trait AreaSelector {
    fn select_area(&self) -> Result<Area, ShellError>;
}

/// Read-only desktop geometry, all in screen space.
pub trait DesktopInfo {
    fn pointer(&self) -> Result<Point, ShellError>;
    fn display_size(&self) -> Result<(i32, i32), ShellError>;
    fn focused_window(&self) -> Result<Area, ShellError>;
}

/// The final notification handed to the shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub style: String,
    pub text: String,
    pub info: String,
    pub area: Option<Area>,
}

/// One-way outbound calls to the shell.
pub trait Notifier {
    fn run(&self, signal: &Signal) -> Result<(), ShellError>;
    fn flash(&self, area: Area) -> Result<(), ShellError>;
}
