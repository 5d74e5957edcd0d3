use std::collections::HashMap;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage, RgbaImage};

use crate::geometry::{Point, Rectangle};

/// A background whose brightest channel is below this value counts as dark.
pub const DARK_THRESHOLD: u8 = 128;

/// Upscale factor used for logographic/syllabic scripts.
pub const CJK_SCALE: u32 = 2;

/// Language code fragments that select [`CJK_SCALE`].
const CJK_LANGS: [&str; 3] = ["chi", "jpn", "kor"];

/// Loads a captured screenshot, keeping its alpha channel for edge trimming.
pub fn load_screenshot(path: &Path) -> Result<RgbaImage, image::ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Width of the translucent border some window captures carry.
///
/// Walks the diagonal from the top-left corner and returns the first offset whose
/// alpha is fully opaque. Returns 0 when no opaque pixel is found within
/// `min(width, height)`.
pub fn border_width(img: &RgbaImage) -> u32 {
    let bound = img.width().min(img.height());
    (0..bound)
        .find(|&i| img.get_pixel(i, i)[3] == 255)
        .unwrap_or(0)
}

/// Crops the capture border symmetrically on all four sides.
///
/// Returns the trimmed image and the border width that was removed. A border
/// that would consume the whole image is ignored.
pub fn trim_edges(img: RgbaImage) -> (RgbaImage, u32) {
    let edge = border_width(&img);
    let (w, h) = img.dimensions();
    if edge == 0 || edge * 2 >= w.min(h) {
        return (img, 0);
    }
    let trimmed = imageops::crop_imm(&img, edge, edge, w - edge * 2, h - edge * 2).to_image();
    (trimmed, edge)
}

/// Most frequent colour in the image; ties go to the lowest packed RGB value.
fn modal_color(img: &RgbImage) -> [u8; 3] {
    let mut counts: HashMap<u32, u32> = HashMap::new();
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        let key = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        *counts.entry(key).or_insert(0) += 1;
    }

    let key = counts
        .into_iter()
        .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
        .map(|(k, _)| k)
        .unwrap_or(0xFF_FF_FF);

    [(key >> 16) as u8, (key >> 8) as u8, key as u8]
}

/// Decides whether the background is dark.
///
/// With an anchor inside the image the pixel under it is sampled (dialogs are
/// locally uniform around the pointer); otherwise the modal colour is used.
pub fn is_dark_background(img: &RgbImage, anchor: Option<Point>) -> bool {
    let sampled = anchor
        .and_then(|p| p.to_pixel(img.width(), img.height()))
        .map(|(x, y)| img.get_pixel(x, y).0);

    let color = match sampled {
        Some(color) => color,
        None => modal_color(img),
    };

    color.iter().copied().max().unwrap_or(255) < DARK_THRESHOLD
}

/// Inverts the image in place when its background is dark so that text always
/// ends up dark on light. Returns whether the image was inverted.
pub fn normalize_polarity(img: &mut RgbImage, anchor: Option<Point>) -> bool {
    let dark = is_dark_background(img, anchor);
    if dark {
        imageops::invert(img);
    }
    dark
}

/// Converts an RGBA capture into the polarity-normalized grayscale image the
/// detector and the OCR backend work on.
pub fn normalize(img: &RgbaImage, anchor: Option<Point>) -> GrayImage {
    let mut rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    if normalize_polarity(&mut rgb, anchor) {
        crate::log("Dark background detected, image inverted");
    }
    imageops::grayscale(&rgb)
}

/// Crops a rectangle (crop-local coordinates) out of an image, clamped to bounds.
pub fn crop_rect(img: &GrayImage, rect: &Rectangle) -> GrayImage {
    let (w, h) = img.dimensions();

    let x0 = (rect.x.max(0) as u32).min(w);
    let y0 = (rect.y.max(0) as u32).min(h);
    let rw = (rect.width.max(0) as u32).min(w - x0);
    let rh = (rect.height.max(0) as u32).min(h - y0);

    imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}

/// Upscale factor for a Tesseract language string such as `eng` or `chi_sim+eng`.
pub fn scale_factor(lang: &str) -> u32 {
    if CJK_LANGS.iter().any(|code| lang.contains(code)) {
        CJK_SCALE
    } else {
        1
    }
}

/// Resizes both axes by `factor` with linear interpolation. Factor 1 is a copy.
pub fn scale_image(img: &GrayImage, factor: u32) -> GrayImage {
    if factor <= 1 {
        return img.clone();
    }
    imageops::resize(
        img,
        img.width() * factor,
        img.height() * factor,
        FilterType::Triangle,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, Rgba};

    fn bordered(width: u32, height: u32, edge: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let inside = x >= edge && y >= edge && x < width - edge && y < height - edge;
            if inside {
                Rgba([200, 200, 200, 255])
            } else {
                Rgba([0, 0, 0, 40])
            }
        })
    }

    #[test]
    fn test_border_width_found_on_diagonal() {
        assert_eq!(border_width(&bordered(40, 30, 4)), 4);
        assert_eq!(border_width(&bordered(40, 30, 0)), 0);
    }

    #[test]
    fn test_border_width_none_opaque() {
        let img = RgbaImage::from_pixel(20, 20, Rgba([10, 10, 10, 100]));
        assert_eq!(border_width(&img), 0);
    }

    #[test]
    fn test_trim_edges_crops_all_sides() {
        let (trimmed, edge) = trim_edges(bordered(40, 30, 4));
        assert_eq!(edge, 4);
        assert_eq!(trimmed.dimensions(), (32, 22));
        assert_eq!(trimmed.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_trim_edges_idempotent() {
        let (once, _) = trim_edges(bordered(40, 30, 5));
        let (twice, edge) = trim_edges(once.clone());
        assert_eq!(edge, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dark_background_inverted() {
        let mut img = RgbImage::from_fn(10, 10, |x, _| {
            if x == 0 { Rgb([250, 250, 250]) } else { Rgb([30, 40, 50]) }
        });
        let original = img.clone();

        assert!(normalize_polarity(&mut img, None));
        for (a, b) in img.pixels().zip(original.pixels()) {
            assert_eq!(a.0[0], 255 - b.0[0]);
            assert_eq!(a.0[1], 255 - b.0[1]);
            assert_eq!(a.0[2], 255 - b.0[2]);
        }
    }

    #[test]
    fn test_light_background_untouched() {
        // Brightest channel exactly at the threshold is not dark
        let mut img = RgbImage::from_pixel(10, 10, Rgb([DARK_THRESHOLD, 0, 0]));
        let original = img.clone();
        assert!(!normalize_polarity(&mut img, None));
        assert_eq!(img, original);
    }

    #[test]
    fn test_anchor_sampling_overrides_mode() {
        // Mostly white, with a dark patch under the anchor
        let img = RgbImage::from_fn(20, 20, |x, y| {
            if x < 5 && y < 5 { Rgb([10, 10, 10]) } else { Rgb([240, 240, 240]) }
        });
        assert!(is_dark_background(&img, Some(Point::new(2, 2))));
        assert!(!is_dark_background(&img, None));
        // Out-of-bounds anchor falls back to the modal colour
        assert!(!is_dark_background(&img, Some(Point::new(50, 2))));
    }

    #[test]
    fn test_modal_color_tie_prefers_lowest() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([200, 0, 0]) } else { Rgb([100, 0, 0]) }
        });
        assert_eq!(modal_color(&img), [100, 0, 0]);
    }

    #[test]
    fn test_scale_factor_by_language() {
        assert_eq!(scale_factor("eng"), 1);
        assert_eq!(scale_factor("chi_sim"), 2);
        assert_eq!(scale_factor("eng+jpn"), 2);
        assert_eq!(scale_factor("kor"), 2);
    }

    #[test]
    fn test_scale_image_identity_and_double() {
        let img = GrayImage::from_fn(13, 7, |x, y| Luma([(x * 10 + y) as u8]));
        assert_eq!(scale_image(&img, 1), img);
        assert_eq!(scale_image(&img, 2).dimensions(), (26, 14));
    }

    #[test]
    fn test_crop_rect_clamps() {
        let img = GrayImage::from_fn(100, 50, |x, y| Luma([(x + y) as u8]));
        let rect = Rectangle::extracted(90, 40, 30, 30, 5000).unwrap();
        let cropped = crop_rect(&img, &rect);
        assert_eq!(cropped.dimensions(), (10, 10));
        assert_eq!(cropped.get_pixel(0, 0)[0], 130);
    }
}
