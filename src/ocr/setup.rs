use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Install locations checked when `tesseract` is not on `PATH`.
const COMMON_PATHS: [&str; 3] = [
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

fn runs(executable: &Path) -> bool {
    Command::new(executable)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Finds the Tesseract executable: configured path first, then `PATH`, then
/// common install locations.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        crate::log(&format!(
            "Configured Tesseract not found at {}, searching system",
            path.display()
        ));
    }

    // Check PATH
    let on_path = PathBuf::from("tesseract");
    if runs(&on_path) {
        return Ok(on_path);
    }

    for path in &COMMON_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Please install Tesseract-OCR (e.g. `tesseract-ocr` package)."
    ))
}

/// Finds a tessdata directory to pass explicitly, if any.
///
/// `None` lets Tesseract use its compiled-in default.
pub fn find_tessdata_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured.filter(|d| d.is_dir()) {
        return Some(dir.to_path_buf());
    }

    // Check TESSDATA_PREFIX environment variable
    let prefix = PathBuf::from(std::env::var_os("TESSDATA_PREFIX")?);
    [prefix.join("tessdata"), prefix]
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_configured_executable_wins() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("tesseract");
        std::fs::write(&exe, "").unwrap();
        assert_eq!(find_tesseract_executable(Some(&exe)).unwrap(), exe);
    }

    #[test]
    fn test_configured_tessdata_must_exist() {
        let dir = tempdir().unwrap();
        assert_eq!(
            find_tessdata_dir(Some(dir.path())),
            Some(dir.path().to_path_buf())
        );
    }
}
