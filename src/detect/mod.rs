//! Point-anchored text region detection.
//!
//! This module provides:
//! - Binarization with an automatic (Otsu) threshold
//! - Rectangular dilation to merge strokes into line/paragraph blobs
//! - Contour bounding rectangles filtered by area ratio
//! - Dialog isolation for non-uniform window chrome (`dialog`)
//! - Point-to-rectangle selection (`select`)

pub mod dialog;
pub mod inspect;
pub mod select;

pub use dialog::isolate_dialog;
pub use inspect::{DumpInspector, Inspect};
pub use select::select_rect;

use image::{GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::contrast::otsu_level;
use imageproc::point::Point as ContourPoint;

use crate::geometry::Rectangle;

/// Candidates at or below this share of the image are noise specks.
pub const MIN_AREA_RATIO: f64 = 0.002;

/// Candidates at or above this share of the image are the whole-frame contour.
pub const MAX_AREA_RATIO: f64 = 0.95;

/// Dilation passes applied to every binarized image.
pub const DILATE_ITERATIONS: u32 = 3;

/// Rectangular structuring element, `width` columns by `height` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kernel {
    pub width: u32,
    pub height: u32,
}

impl Kernel {
    /// Word-sized kernel, also used for the dialog pre-mask.
    pub const SMALL: Kernel = Kernel::new(3, 3);
    pub const LINE: Kernel = Kernel::new(6, 3);
    pub const PARAGRAPH: Kernel = Kernel::new(9, 7);
    pub const DIALOG: Kernel = Kernel::new(9, 9);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Inverse binarization: pixels at or below the Otsu level (ink) become 255.
pub fn binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    let mut binary = gray.clone();
    for pixel in binary.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { 0 } else { 255 };
    }
    binary
}

/// Running maximum along rows (`horizontal`) or columns with the anchor at
/// `len / 2`, matching a rectangular structuring element.
fn max_filter(img: &GrayImage, len: u32, horizontal: bool) -> GrayImage {
    let (w, h) = img.dimensions();
    let anchor = len / 2;
    let tail = len - anchor;

    GrayImage::from_fn(w, h, |x, y| {
        let value = if horizontal {
            (x.saturating_sub(anchor)..(x + tail).min(w))
                .map(|i| img.get_pixel(i, y)[0])
                .max()
        } else {
            (y.saturating_sub(anchor)..(y + tail).min(h))
                .map(|j| img.get_pixel(x, j)[0])
                .max()
        };
        Luma([value.unwrap_or(0)])
    })
}

/// Dilates with a `kernel`-sized rectangle, `iterations` times.
///
/// A rectangle is separable, so each pass is a row maximum followed by a
/// column maximum.
pub fn dilate(binary: &GrayImage, kernel: Kernel, iterations: u32) -> GrayImage {
    let mut out = binary.clone();
    if kernel.width == 0 || kernel.height == 0 {
        return out;
    }
    for _ in 0..iterations {
        out = max_filter(&max_filter(&out, kernel.width, true), kernel.height, false);
    }
    out
}

fn bounding_rect(points: &[ContourPoint<i32>], image_area: u64) -> Option<Rectangle> {
    let first = points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in points {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Rectangle::extracted(x0, y0, x1 - x0 + 1, y1 - y0 + 1, image_area)
}

fn within_band(rect: &Rectangle) -> bool {
    rect.area_ratio > MIN_AREA_RATIO && rect.area_ratio < MAX_AREA_RATIO
}

/// Bounding rectangles of every contour (outer borders and holes) of a binary
/// mask, keeping only those inside the area-ratio band.
pub fn candidate_rects(mask: &GrayImage) -> Vec<Rectangle> {
    let image_area = mask.width() as u64 * mask.height() as u64;
    find_contours::<i32>(mask)
        .iter()
        .filter_map(|contour| bounding_rect(&contour.points, image_area))
        .filter(within_band)
        .collect()
}

/// Finds text-block candidates in a polarity-normalized grayscale image.
///
/// An empty result means nothing was detected; it is not an error here.
pub fn find_text_regions(gray: &GrayImage, kernel: Kernel) -> Vec<Rectangle> {
    let dilated = dilate(&binarize(gray), kernel, DILATE_ITERATIONS);
    let rects = candidate_rects(&dilated);
    crate::log(&format!(
        "Region detector: {} candidate(s) with {}x{} kernel",
        rects.len(),
        kernel.width,
        kernel.height
    ));
    rects
}
