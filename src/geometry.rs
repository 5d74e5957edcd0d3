//! Points and rectangles shared by detection, selection and the desktop collaborators.
//!
//! Two coordinate spaces exist: screen space (what the shell reports) and crop-local
//! space (relative to a captured image). Converting between them is an additive offset.

/// An integer point in either screen or crop-local space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifts the point by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the point as unsigned pixel coordinates if it lies inside a
    /// `width` x `height` image.
    pub fn to_pixel(self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.x < 0 || self.y < 0 {
            return None;
        }
        let (x, y) = (self.x as u32, self.y as u32);
        (x < width && y < height).then_some((x, y))
    }
}

/// An axis-aligned area on screen, as exchanged with the shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Area {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// `[x, y, width, height]`, the layout the shell expects.
    pub const fn to_array(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// A candidate text rectangle.
///
/// `area_ratio` is the rectangle's pixel area divided by the pixel area of the
/// image it was extracted from. It is computed once, at extraction, and carried
/// unchanged through any later translation into screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub area_ratio: f64,
}

impl Rectangle {
    /// Builds a rectangle extracted from an image of `image_area` pixels.
    ///
    /// Returns `None` for degenerate rectangles or an empty image.
    pub fn extracted(x: i32, y: i32, width: i32, height: i32, image_area: u64) -> Option<Self> {
        if width <= 0 || height <= 0 || image_area == 0 {
            return None;
        }
        let ratio = (width as f64 * height as f64) / image_area as f64;
        Some(Self {
            x,
            y,
            width,
            height,
            area_ratio: ratio.min(1.0),
        })
    }

    /// A rectangle covering a whole captured area.
    pub fn whole(area: Area) -> Self {
        Self {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height,
            area_ratio: 1.0,
        }
    }

    /// Translates the rectangle, keeping its area ratio.
    pub fn offset(self, origin: Point) -> Self {
        Self {
            x: self.x + origin.x,
            y: self.y + origin.y,
            ..self
        }
    }

    /// Strict interior test: a point on any edge is not contained.
    pub fn strictly_contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }

    /// Sum of squared per-axis gaps between the point and the rectangle.
    ///
    /// On each axis the gap is zero while the coordinate lies within the
    /// rectangle's span, otherwise the distance to the nearest edge.
    pub fn gap_cost(&self, p: Point) -> i64 {
        let gap = |start: i32, len: i32, v: i32| -> i64 {
            let (start, len, v) = (start as i64, len as i64, v as i64);
            (start - v).max(0).max(v - start - len)
        };
        let dx = gap(self.x, self.width, p.x);
        let dy = gap(self.y, self.height, p.y);
        dx * dx + dy * dy
    }

    pub fn area(&self) -> Area {
        Area::new(self.x, self.y, self.width, self.height)
    }
}
