//! Scoped temporary screenshots.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tempfile::NamedTempFile;

use super::ShellError;
use crate::error::LookupError;
use crate::ocr::preprocess::load_screenshot;

/// Removes a screenshot written somewhere other than the requested path.
struct Stray(Option<PathBuf>);

impl Drop for Stray {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Captures into a temporary PNG, reads it back and deletes it.
///
/// `shoot` receives the destination path and returns the path it wrote. The
/// temporary file is removed on every exit path, including capture and decode
/// failures.
pub fn take_screenshot(
    shoot: impl FnOnce(&Path) -> Result<PathBuf, ShellError>,
) -> Result<RgbaImage, LookupError> {
    let file = NamedTempFile::with_suffix(".png")?;
    let written = shoot(file.path())?;
    let _stray = Stray((written != file.path()).then(|| written.clone()));

    let image = load_screenshot(&written)?;
    crate::log(&format!(
        "Captured {}x{} screenshot",
        image.width(),
        image.height()
    ));
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::cell::RefCell;

    #[test]
    fn test_screenshot_loaded_and_removed() {
        let seen = RefCell::new(PathBuf::new());
        let image = take_screenshot(|dest| {
            RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 255])).save(dest).unwrap();
            *seen.borrow_mut() = dest.to_path_buf();
            Ok(dest.to_path_buf())
        })
        .unwrap();

        assert_eq!(image.dimensions(), (8, 6));
        assert!(!seen.borrow().exists());
    }

    #[test]
    fn test_removed_on_capture_failure() {
        let seen = RefCell::new(PathBuf::new());
        let result = take_screenshot(|dest| {
            *seen.borrow_mut() = dest.to_path_buf();
            Err(ShellError::Failed("Screenshot failed".to_string()))
        });

        assert_eq!(result.unwrap_err().to_string(), "Screenshot failed");
        assert!(!seen.borrow().exists());
    }

    #[test]
    fn test_removed_on_unreadable_image() {
        let seen = RefCell::new(PathBuf::new());
        let result = take_screenshot(|dest| {
            *seen.borrow_mut() = dest.to_path_buf();
            Ok(dest.to_path_buf()) // left empty, not a PNG
        });

        assert!(result.is_err());
        assert!(!seen.borrow().exists());
    }

    #[test]
    fn test_stray_path_removed() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("elsewhere.png");
        let image = take_screenshot(|_| {
            RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])).save(&other).unwrap();
            Ok(other.clone())
        })
        .unwrap();

        assert_eq!(image.dimensions(), (4, 4));
        assert!(!other.exists());
    }
}
