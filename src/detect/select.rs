use std::cmp::Ordering;

use crate::geometry::{Point, Rectangle};

/// Final tie-break so the winner never depends on candidate order.
fn by_position(a: &Rectangle, b: &Rectangle) -> Ordering {
    (a.y, a.x, a.height, a.width).cmp(&(b.y, b.x, b.height, b.width))
}

/// Picks the rectangle that best represents the text block at or near `anchor`.
///
/// 1. Among rectangles strictly containing the anchor, the smallest area ratio.
/// 2. Otherwise the rectangle with the lowest clamped squared distance.
/// 3. `None` when there are no candidates.
pub fn select_rect(candidates: &[Rectangle], anchor: Point) -> Option<Rectangle> {
    let enclosing = candidates
        .iter()
        .filter(|r| r.strictly_contains(anchor))
        .min_by(|a, b| {
            a.area_ratio
                .total_cmp(&b.area_ratio)
                .then_with(|| by_position(a, b))
        });

    let chosen = enclosing.or_else(|| {
        candidates.iter().min_by(|a, b| {
            a.gap_cost(anchor)
                .cmp(&b.gap_cost(anchor))
                .then_with(|| a.area_ratio.total_cmp(&b.area_ratio))
                .then_with(|| by_position(a, b))
        })
    });

    if let Some(rect) = chosen {
        crate::log(&format!(
            "Selected rect ({}, {}, {}x{}) for anchor ({}, {}) among {} candidate(s)",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            anchor.x,
            anchor.y,
            candidates.len()
        ));
    }
    chosen.copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_AREA: u64 = 100_000;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle {
        Rectangle::extracted(x, y, w, h, IMAGE_AREA).unwrap()
    }

    #[test]
    fn test_prefers_tightest_enclosing() {
        let inner = rect(10, 10, 10, 10); // area 100
        let outer = rect(5, 5, 20, 20); // area 400, contains inner
        let anchor = Point::new(15, 15);

        assert_eq!(select_rect(&[outer, inner], anchor), Some(inner));
        assert_eq!(select_rect(&[inner, outer], anchor), Some(inner));
    }

    #[test]
    fn test_touching_beats_gap() {
        // Anchor sits on the right edge of `touching`, so no strict containment
        let touching = rect(0, 0, 10, 10);
        let distant = rect(20, 0, 10, 10);
        let anchor = Point::new(10, 5);

        assert_eq!(select_rect(&[distant, touching], anchor), Some(touching));
    }

    #[test]
    fn test_boundary_point_is_not_inside() {
        let small = rect(10, 10, 10, 10);
        let big = rect(0, 0, 40, 40);
        // On the small rect's left edge, strictly inside the big one
        assert_eq!(select_rect(&[small, big], Point::new(10, 15)), Some(big));
    }

    #[test]
    fn test_nearest_by_clamped_distance() {
        let left = rect(0, 0, 10, 10); // gap 5 on x
        let below = rect(15, 30, 10, 10); // gap 25 on y
        assert_eq!(select_rect(&[below, left], Point::new(15, 5)), Some(left));
    }

    #[test]
    fn test_ties_independent_of_order() {
        let a = rect(0, 0, 10, 10);
        let b = rect(20, 0, 10, 10);
        let anchor = Point::new(15, 5); // equidistant, equal areas
        assert_eq!(select_rect(&[a, b], anchor), select_rect(&[b, a], anchor));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(select_rect(&[], Point::new(1, 1)), None);
    }
}
