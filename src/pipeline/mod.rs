//! Mode orchestration: capture, detect, recognize, and deliver.
//!
//! Each [`Mode`] has its own handler. Handlers propagate a typed
//! [`LookupError`] and the outcome is classified once, when it becomes a
//! [`Lookup`].

pub mod result;

pub use result::{EXIT_CANCELLED, Found, Lookup, Style};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::capture::{
    AreaSelector, DesktopInfo, Notifier, ScreenCapture, ShellError, take_screenshot,
};
use crate::config::{CaptureSource, WordArea};
use crate::detect::{Inspect, Kernel, find_text_regions, isolate_dialog, select_rect};
use crate::error::LookupError;
use crate::geometry::{Area, Point, Rectangle};
use crate::ocr::preprocess::{crop_rect, normalize, scale_factor, scale_image, trim_edges};
use crate::ocr::{OcrBackend, OcrToken, Reflow, clean_word, reflow};

/// Smallest capture extent, in pixels, worth recognizing.
const MIN_CAPTURE: i32 = 5;

/// What to look up around the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The single word under the pointer.
    #[default]
    Word,
    /// The paragraph under the pointer.
    Paragraph,
    /// The text line under the pointer.
    Line,
    /// A user-selected area.
    Area,
    /// The text block of the dialog under the pointer.
    Dialog,
}

/// Desktop and OCR collaborators for one lookup.
pub struct Services<'a> {
    pub capture: &'a dyn ScreenCapture,
    pub selector: &'a dyn AreaSelector,
    pub info: &'a dyn DesktopInfo,
    pub ocr: &'a dyn OcrBackend,
}

/// Per-invocation settings threaded through every stage.
pub struct Options<'a> {
    pub lang: String,
    pub reflow: Reflow,
    pub word_area: WordArea,
    pub capture: CaptureSource,
    pub inspector: Option<&'a dyn Inspect>,
}

/// Runs one lookup in `mode`.
pub fn run(mode: Mode, services: &Services, options: &Options) -> Lookup {
    crate::log(&format!("Lookup started: mode={:?} lang={}", mode, options.lang));
    let outcome = match mode {
        Mode::Word => ocr_word(services, options),
        Mode::Area => ocr_area(services, options),
        Mode::Paragraph => ocr_block(services, options, Kernel::PARAGRAPH, false),
        Mode::Line => ocr_block(services, options, Kernel::LINE, false),
        Mode::Dialog => ocr_block(services, options, Kernel::DIALOG, true),
    };
    outcome.into()
}

/// The capture area around `pointer` for word mode, and the pointer's
/// position inside it.
pub fn word_capture(
    pointer: Point,
    display: (i32, i32),
    limit: WordArea,
) -> Result<(Area, Point), LookupError> {
    let w = pointer.x.min(display.0 - pointer.x).min(limit.width);
    let h = pointer.y.min(display.1 - pointer.y).min(limit.height);
    if w < MIN_CAPTURE || h < MIN_CAPTURE {
        return Err(LookupError::TooMarginal);
    }
    Ok((
        Area::new(pointer.x - w, pointer.y - h, 2 * w, 2 * h),
        Point::new(w, h),
    ))
}

fn ocr_word(services: &Services, options: &Options) -> Result<Found, LookupError> {
    let pointer = services.info.pointer()?;
    let display = services.info.display_size()?;
    let (area, anchor) = word_capture(pointer, display, options.word_area)?;
    crate::log(&format!(
        "Word capture ({}, {}, {}x{})",
        area.x, area.y, area.width, area.height
    ));

    let image = take_screenshot(|dest| services.capture.capture_area(area, dest))?;
    let gray = normalize(&image, None);
    let tokens = services.ocr.recognize_tokens(&gray, &options.lang)?;

    let image_area = gray.width() as u64 * gray.height() as u64;
    let (rects, words): (Vec<Rectangle>, Vec<&OcrToken>) = tokens
        .iter()
        .filter_map(|t| {
            Rectangle::extracted(t.left, t.top, t.width, t.height, image_area).map(|r| (r, t))
        })
        .unzip();

    if let Some(inspector) = options.inspector {
        inspector.inspect(&gray, &rects, anchor);
    }

    let chosen = select_rect(&rects, anchor).ok_or(LookupError::NoText)?;
    let index = rects
        .iter()
        .position(|r| *r == chosen)
        .ok_or(LookupError::NoText)?;
    let token = words[index];
    crate::log(&format!(
        "Word token {:?} (confidence {:.1})",
        token.text, token.confidence
    ));
    let text = clean_word(&token.text).ok_or(LookupError::NoText)?;

    Ok(Found {
        text,
        area: chosen.offset(area.origin()),
    })
}

fn ocr_area(services: &Services, options: &Options) -> Result<Found, LookupError> {
    let area = services.selector.select_area()?;
    if area.width < MIN_CAPTURE || area.height < MIN_CAPTURE {
        return Err(LookupError::TooMarginal);
    }

    let image = take_screenshot(|dest| services.capture.capture_area(area, dest))?;
    let gray = normalize(&image, None);
    let text = recognize(services.ocr, &gray, options)?;

    Ok(Found {
        text,
        area: Rectangle::whole(area),
    })
}

/// Paragraph, line and dialog: detect the block under the pointer and
/// recognize it.
fn ocr_block(
    services: &Services,
    options: &Options,
    kernel: Kernel,
    dialog: bool,
) -> Result<Found, LookupError> {
    let pointer = services.info.pointer()?;

    let (image, origin) = match options.capture {
        CaptureSource::Window => {
            let frame = services.info.focused_window()?;
            let raw = take_screenshot(|dest| services.capture.capture_window(dest))?;
            let (trimmed, edge) = trim_edges(raw);
            let edge = edge as i32;
            (trimmed, frame.origin().offset(edge, edge))
        }
        CaptureSource::Screen => {
            let raw = take_screenshot(|dest| services.capture.capture_fullscreen(dest))?;
            (raw, Point::default())
        }
    };
    let anchor = pointer.offset(-origin.x, -origin.y);

    let gray = normalize(&image, dialog.then_some(anchor));
    let searched = if dialog {
        isolate_dialog(&gray, anchor).ok_or(LookupError::Preprocess)?
    } else {
        gray
    };

    let candidates = find_text_regions(&searched, kernel);
    if let Some(inspector) = options.inspector {
        inspector.inspect(&searched, &candidates, anchor);
    }
    let chosen = select_rect(&candidates, anchor).ok_or(LookupError::Preprocess)?;

    let text = recognize(services.ocr, &crop_rect(&searched, &chosen), options)?;
    Ok(Found {
        text,
        area: chosen.offset(origin),
    })
}

/// Scales for the language, runs OCR and reflows the output.
fn recognize(
    ocr: &dyn OcrBackend,
    gray: &image::GrayImage,
    options: &Options,
) -> Result<String, LookupError> {
    let factor = scale_factor(&options.lang);
    if factor > 1 {
        crate::log(&format!("Scaling by {} for {}", factor, options.lang));
    }
    let raw = ocr.recognize_text(&scale_image(gray, factor), &options.lang)?;
    reflow(&raw, options.reflow)?.ok_or(LookupError::NoText)
}

/// Whether a lookup reached the shell or ended in cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Signalled,
    Cancelled,
}

/// Hands the result to the shell.
///
/// A cancelled lookup makes no calls at all. `flash` highlights the area
/// first; `cursor` drops the area so the shell places the popup at the cursor.
pub fn deliver(
    mut lookup: Lookup,
    notifier: &dyn Notifier,
    flash: bool,
    cursor: bool,
) -> Result<Delivery, ShellError> {
    if lookup.cancelled {
        return Ok(Delivery::Cancelled);
    }

    if flash {
        if let Some(rect) = lookup.area {
            if let Err(e) = notifier.flash(rect.area()) {
                crate::log(&format!("Flash failed: {}", e));
            }
        }
    }
    if cursor {
        lookup.area = None;
    }

    notifier.run(&lookup.signal())?;
    Ok(Delivery::Signalled)
}
