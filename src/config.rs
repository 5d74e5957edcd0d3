//! User configuration.
//!
//! Loaded from config.json at startup, then overridden by command-line flags.
//! Every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ocr::Reflow;
use crate::pipeline::{Mode, Style};

/// Maximum half-extent of the word-mode capture around the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordArea {
    pub width: i32,
    pub height: i32,
}

impl Default for WordArea {
    fn default() -> Self {
        Self {
            width: 250,
            height: 50,
        }
    }
}

/// Source image for block modes (paragraph, line, dialog).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// The focused window, with its translucent edge trimmed.
    #[default]
    Window,
    /// The whole screen.
    Screen,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    /// Tesseract language(s), `+`-joined
    pub lang: String,
    pub style: Style,
    /// Swift style name, appended as `style:name`
    pub name: String,
    pub quiet: bool,
    pub flash: bool,
    pub cursor: bool,
    pub word_area: WordArea,
    pub reflow: Reflow,
    pub capture: CaptureSource,
    pub tesseract: Option<PathBuf>,
    pub tessdata: Option<PathBuf>,
    /// Where detection snapshots are written, if anywhere
    pub debug_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Word,
            lang: "eng".to_string(),
            style: Style::Auto,
            name: String::new(),
            quiet: false,
            flash: false,
            cursor: false,
            word_area: WordArea::default(),
            reflow: Reflow::default(),
            capture: CaptureSource::default(),
            tesseract: None,
            tessdata: None,
            debug_dir: None,
        }
    }
}

/// Loads configuration from `path`, falling back to defaults.
pub fn load_config(path: &Path) -> Config {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if !path.exists() {
        crate::log("No config file found, using defaults");
        return Config::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                crate::log("Config loaded");
                config
            }
            Err(e) => {
                crate::log(&format!("Failed to parse config: {}. Using defaults.", e));
                Config::default()
            }
        },
        Err(e) => {
            crate::log(&format!("Failed to read config: {}. Using defaults.", e));
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.word_area, WordArea { width: 250, height: 50 });
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "mode": "dialog", "lang": "jpn+eng", "reflow": "paragraphs", "capture": "screen" }"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.mode, Mode::Dialog);
        assert_eq!(config.lang, "jpn+eng");
        assert_eq!(config.reflow, Reflow::Paragraphs);
        assert_eq!(config.capture, CaptureSource::Screen);
        assert_eq!(config.style, Style::Auto);
        assert!(!config.quiet);
    }

    #[test]
    fn test_unparsable_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(&path), Config::default());
    }
}
