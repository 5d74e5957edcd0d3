//! GNOME Shell over the session bus.
//!
//! Screenshots, selection and flashing go through `org.gnome.Shell.Screenshot`.
//! Pointer/window geometry and the final notification go through the
//! LightDict shell extension.

use std::path::{Path, PathBuf};

use serde::Serialize;
use zbus::blocking::Connection;
use zbus::zvariant::{DynamicDeserialize, DynamicType};

use super::{AreaSelector, DesktopInfo, Notifier, ScreenCapture, ShellError, Signal};
use crate::geometry::{Area, Point};

const SCREENSHOT_DEST: &str = "org.gnome.Shell.Screenshot";
const SCREENSHOT_PATH: &str = "/org/gnome/Shell/Screenshot";
const SCREENSHOT_IFACE: &str = "org.gnome.Shell.Screenshot";

const SHELL_DEST: &str = "org.gnome.Shell";
const EXTENSION_PATH: &str = "/org/gnome/Shell/Extensions/LightDict";
const EXTENSION_IFACE: &str = "org.gnome.Shell.Extensions.LightDict";

/// GIO's `G_IO_ERROR_CANCELLED`, as mapped onto a D-Bus error name.
const GIO_CANCELLED_CODE: &str = "Code19";

/// Whether a D-Bus error name reports a user cancellation.
fn is_cancellation(error_name: &str) -> bool {
    error_name.ends_with(".Cancelled")
        || (error_name.contains("g_2dio_2derror") && error_name.ends_with(GIO_CANCELLED_CODE))
}

fn classify(error: zbus::Error) -> ShellError {
    match error {
        zbus::Error::MethodError(name, message, _) => {
            if is_cancellation(name.as_str()) {
                ShellError::Cancelled
            } else {
                ShellError::Failed(message.unwrap_or_else(|| name.to_string()))
            }
        }
        other => ShellError::Bus(other),
    }
}

/// Pulls a fixed-size integer record out of a `Get` reply.
fn record<const N: usize>(
    values: Option<&Vec<i32>>,
    what: &'static str,
) -> Result<[i32; N], ShellError> {
    values
        .and_then(|v| <[i32; N]>::try_from(v.as_slice()).ok())
        .ok_or(ShellError::Unavailable(what))
}

/// Blocking session-bus client for GNOME Shell.
pub struct GnomeShell {
    conn: Connection,
}

impl GnomeShell {
    pub fn connect() -> Result<Self, ShellError> {
        let conn = Connection::session()?;
        crate::log("Connected to session bus");
        Ok(Self { conn })
    }

    fn call<B, R>(
        &self,
        dest: &str,
        path: &str,
        iface: &str,
        method: &str,
        body: &B,
    ) -> Result<R, ShellError>
    where
        B: Serialize + DynamicType,
        R: for<'d> DynamicDeserialize<'d>,
    {
        let reply = self
            .conn
            .call_method(Some(dest), path, Some(iface), method, body)
            .map_err(classify)?;
        Ok(reply.body().deserialize::<R>()?)
    }

    fn screenshot<B>(&self, method: &str, body: &B) -> Result<PathBuf, ShellError>
    where
        B: Serialize + DynamicType,
    {
        let (success, written): (bool, String) =
            self.call(SCREENSHOT_DEST, SCREENSHOT_PATH, SCREENSHOT_IFACE, method, body)?;
        if success {
            Ok(PathBuf::from(written))
        } else {
            Err(ShellError::Failed(format!("{method} failed")))
        }
    }

    fn get(&self, property: &str) -> Result<Vec<Vec<i32>>, ShellError> {
        let (values,): (Vec<Vec<i32>>,) = self.call(
            SHELL_DEST,
            EXTENSION_PATH,
            EXTENSION_IFACE,
            "Get",
            &(vec![property],),
        )?;
        Ok(values)
    }
}

fn dest_str(dest: &Path) -> String {
    dest.to_string_lossy().into_owned()
}

impl ScreenCapture for GnomeShell {
    fn capture_area(&self, area: Area, dest: &Path) -> Result<PathBuf, ShellError> {
        self.screenshot(
            "ScreenshotArea",
            &(area.x, area.y, area.width, area.height, false, dest_str(dest)),
        )
    }

    fn capture_window(&self, dest: &Path) -> Result<PathBuf, ShellError> {
        // include_frame, include_cursor, flash
        self.screenshot("ScreenshotWindow", &(false, false, false, dest_str(dest)))
    }

    fn capture_fullscreen(&self, dest: &Path) -> Result<PathBuf, ShellError> {
        self.screenshot("Screenshot", &(false, false, dest_str(dest)))
    }
}

impl AreaSelector for GnomeShell {
    fn select_area(&self) -> Result<Area, ShellError> {
        let (x, y, width, height): (i32, i32, i32, i32) = self.call(
            SCREENSHOT_DEST,
            SCREENSHOT_PATH,
            SCREENSHOT_IFACE,
            "SelectArea",
            &(),
        )?;
        Ok(Area::new(x, y, width, height))
    }
}

impl DesktopInfo for GnomeShell {
    fn pointer(&self) -> Result<Point, ShellError> {
        let [x, y] = record::<2>(self.get("pointer")?.first(), "pointer")?;
        Ok(Point::new(x, y))
    }

    fn display_size(&self) -> Result<(i32, i32), ShellError> {
        let [width, height] = record::<2>(self.get("display")?.first(), "display")?;
        Ok((width, height))
    }

    fn focused_window(&self) -> Result<Area, ShellError> {
        let [x, y, width, height] = record::<4>(self.get("focused")?.first(), "focused window")?;
        Ok(Area::new(x, y, width, height))
    }
}

impl Notifier for GnomeShell {
    fn run(&self, signal: &Signal) -> Result<(), ShellError> {
        let area = signal
            .area
            .map(|a| a.to_array().to_vec())
            .unwrap_or_default();
        crate::log(&format!(
            "Signalling style={} text_len={} info={:?}",
            signal.style,
            signal.text.len(),
            signal.info
        ));
        self.conn
            .call_method(
                Some(SHELL_DEST),
                EXTENSION_PATH,
                Some(EXTENSION_IFACE),
                "Run",
                &(
                    signal.style.as_str(),
                    signal.text.as_str(),
                    signal.info.as_str(),
                    area,
                ),
            )
            .map_err(classify)?;
        Ok(())
    }

    fn flash(&self, area: Area) -> Result<(), ShellError> {
        self.conn
            .call_method(
                Some(SCREENSHOT_DEST),
                SCREENSHOT_PATH,
                Some(SCREENSHOT_IFACE),
                "FlashArea",
                &(area.x, area.y, area.width, area.height),
            )
            .map_err(classify)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_error_names() {
        assert!(is_cancellation(
            "org.gtk.GDBus.UnmappedGError.Quark._g_2dio_2derror_2dquark.Code19"
        ));
        assert!(is_cancellation("org.freedesktop.DBus.Error.Cancelled"));
        assert!(!is_cancellation(
            "org.gtk.GDBus.UnmappedGError.Quark._g_2dio_2derror_2dquark.Code1"
        ));
        assert!(!is_cancellation("org.freedesktop.DBus.Error.Failed"));
    }

    #[test]
    fn test_record_shapes() {
        let pointer = vec![640, 480];
        assert_eq!(record::<2>(Some(&pointer), "pointer").unwrap(), [640, 480]);

        let short = vec![1, 2, 3];
        let err = record::<4>(Some(&short), "focused window").unwrap_err();
        assert_eq!(err.to_string(), "focused window is unavailable");
        assert!(record::<2>(None, "pointer").is_err());
    }
}
