//! Dialog isolation for window chrome with a non-uniform background.
//!
//! The dilated threshold of the window is flood filled from the pointer to get the
//! dialog's own background (interior), then from the top-left corner over
//! everything else to get the surroundings (exterior). Both are painted white on
//! top of the grayscale image, leaving only the text enclosed by the dialog.

use image::{GrayImage, Luma};

use super::{DILATE_ITERATIONS, Kernel, binarize, dilate};
use crate::geometry::Point;

#[derive(Clone, Copy)]
enum Connectivity {
    Four,
    Eight,
}

/// Offsets of the neighbours visited from a filled pixel.
fn neighbours(connectivity: Connectivity) -> &'static [(i32, i32)] {
    const FOUR: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    const EIGHT: [(i32, i32); 8] = [
        (-1, 0),
        (1, 0),
        (0, -1),
        (0, 1),
        (-1, -1),
        (1, -1),
        (-1, 1),
        (1, 1),
    ];
    match connectivity {
        Connectivity::Four => &FOUR,
        Connectivity::Eight => &EIGHT,
    }
}

/// Filled pixels plus the number of stack pushes it took.
struct Fill {
    filled: Vec<bool>,
    pushes: usize,
}

/// A pixel is marked when it is pushed, so it enters the stack at most once.
fn fill(
    width: u32,
    height: u32,
    seed: (u32, u32),
    connectivity: Connectivity,
    passable: impl Fn(usize) -> bool,
) -> Fill {
    let mut filled = vec![false; width as usize * height as usize];
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    let seed_index = index(seed.0, seed.1);
    if !passable(seed_index) {
        return Fill { filled, pushes: 0 };
    }
    filled[seed_index] = true;
    let mut stack = vec![seed];
    let mut pushes = 1;

    while let Some((x, y)) = stack.pop() {
        for &(dx, dy) in neighbours(connectivity) {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if nx >= width || ny >= height {
                continue;
            }
            let i = index(nx, ny);
            if filled[i] || !passable(i) {
                continue;
            }
            filled[i] = true;
            stack.push((nx, ny));
            pushes += 1;
        }
    }

    Fill { filled, pushes }
}

/// Marks every pixel reachable from `seed` through pixels for which
/// `passable(index)` holds.
fn flood_fill(
    width: u32,
    height: u32,
    seed: (u32, u32),
    connectivity: Connectivity,
    passable: impl Fn(usize) -> bool,
) -> Vec<bool> {
    fill(width, height, seed, connectivity, passable).filled
}

/// Masks everything but the text enclosed by the dialog under `anchor`.
///
/// Returns `None` when the anchor lies outside the image.
pub fn isolate_dialog(gray: &GrayImage, anchor: Point) -> Option<GrayImage> {
    let (w, h) = gray.dimensions();
    let seed = anchor.to_pixel(w, h)?;

    let dilated = dilate(&binarize(gray), Kernel::SMALL, DILATE_ITERATIONS);
    let raw = dilated.as_raw();
    let seed_value = dilated.get_pixel(seed.0, seed.1)[0];

    let interior = flood_fill(w, h, seed, Connectivity::Eight, |i| raw[i] == seed_value);
    let exterior = flood_fill(w, h, (0, 0), Connectivity::Four, |i| !interior[i]);

    let covered = interior.iter().filter(|&&f| f).count();
    crate::log(&format!(
        "Dialog isolator: interior covers {} of {} pixels",
        covered,
        w as usize * h as usize
    ));

    let mut out = gray.clone();
    for (i, pixel) in out.pixels_mut().enumerate() {
        if interior[i] || exterior[i] {
            *pixel = Luma([255]);
        }
    }
    Some(out)
}
