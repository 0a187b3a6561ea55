#![forbid(unsafe_code)]

//! Layout-space geometry.
//!
//! Renderers report positions in their own layout units (dp on Android TV,
//! points on tvOS, CSS pixels on the web). The engine never converts between
//! them; it only compares values reported by the same renderer.

use serde::{Deserialize, Serialize};

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self` as `(dx, dy)`.
    #[must_use]
    pub fn delta_from(self, origin: Self) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let (dx, dy) = self.delta_from(other);
        dx.hypot(dy)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned bounding rectangle in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rectangle has finite coordinates and non-negative size.
    ///
    /// Renderers occasionally report NaN geometry for items that are being
    /// recycled; such rects are ignored by the resolver.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Whether `y` falls within the vertical extent of the rectangle.
    #[must_use]
    pub fn spans_y(&self, y: f32) -> bool {
        y >= self.y && y <= self.bottom()
    }

    /// Whether `x` falls within the horizontal extent of the rectangle.
    #[must_use]
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }
}
