//! Inspection hook for intermediate detection state.

use std::path::PathBuf;

use chrono::Local;
use image::{GrayImage, Rgb};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::geometry::{Point, Rectangle};

/// Receives the image the detector ran on, the filtered candidates and the anchor.
pub trait Inspect {
    fn inspect(&self, image: &GrayImage, candidates: &[Rectangle], anchor: Point);
}

/// Writes each inspected frame as a PNG with candidate outlines.
pub struct DumpInspector {
    dir: PathBuf,
}

impl DumpInspector {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Inspect for DumpInspector {
    fn inspect(&self, image: &GrayImage, candidates: &[Rectangle], anchor: Point) {
        let mut canvas = image::DynamicImage::ImageLuma8(image.clone()).to_rgb8();
        for r in candidates {
            let outline = Rect::at(r.x, r.y).of_size(r.width as u32, r.height as u32);
            draw_hollow_rect_mut(&mut canvas, outline, Rgb([40, 240, 80]));
        }
        draw_hollow_circle_mut(&mut canvas, (anchor.x, anchor.y), 20, Rgb([240, 80, 40]));

        let name = format!("detect_{}.png", Local::now().format("%Y%m%d_%H%M%S%.3f"));
        let path = self.dir.join(name);
        let saved = std::fs::create_dir_all(&self.dir)
            .map_err(image::ImageError::IoError)
            .and_then(|_| canvas.save(&path));
        match saved {
            Ok(()) => crate::log(&format!("Saved detection dump: {}", path.display())),
            Err(e) => crate::log(&format!("Could not save detection dump: {}", e)),
        }
    }
}
