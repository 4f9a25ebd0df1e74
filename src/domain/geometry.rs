//! Geometric types for surface coordinates and pixel regions

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A point in surface space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate the point by the given offset
    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    fn debug_check(self) {
        debug_assert!(
            self.x.is_finite() && self.y.is_finite(),
            "non-finite point {self:?}"
        );
    }
}

/// Euclidean distance between two points
pub fn distance(p1: Point, p2: Point) -> f32 {
    p1.debug_check();
    p2.debug_check();
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

pub fn midpoint(p1: Point, p2: Point) -> Point {
    p1.debug_check();
    p2.debug_check();
    Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// Direction from `p1` to `p2` in radians, `atan2(dy, dx)`
pub fn angle(p1: Point, p2: Point) -> f32 {
    p1.debug_check();
    p2.debug_check();
    (p2.y - p1.y).atan2(p2.x - p1.x)
}

/// Shortest distance from `p` to the segment `a`-`b`
///
/// A zero-length segment degrades to the distance from `p` to `a`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq < 1e-6 {
        return distance(p, a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Evaluate a cubic bezier at parameter `t` in `[0, 1]`
pub fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    Point::new(
        mt3 * p0.x + 3.0 * mt2 * t * c1.x + 3.0 * mt * t2 * c2.x + t3 * p3.x,
        mt3 * p0.y + 3.0 * mt2 * t * c1.y + 3.0 * mt * t2 * c2.y + t3 * p3.y,
    )
}

/// Integer pixel rectangle, right/bottom exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Pixel region spanned by two drag corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x).round() as i32;
        let top = a.y.min(b.y).round() as i32;
        let right = a.x.max(b.x).round() as i32;
        let bottom = a.y.max(b.y).round() as i32;
        Self::new(left, top, right, bottom)
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Convert to dimensions (NonZeroU32 width and height)
    pub fn dimensions(self) -> Option<RectDimension> {
        let width = NonZeroU32::new((self.width()).unsigned_abs())?;
        let height = NonZeroU32::new((self.height()).unsigned_abs())?;
        Some(RectDimension { width, height })
    }
}

/// Non-zero dimensions of a rectangle
#[derive(Clone, Copy, Debug)]
pub struct RectDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl RectDimension {
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }
}
