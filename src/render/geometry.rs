//! Shared geometry calculations for annotation rendering

use crate::domain::{Point, angle};

/// Arrow geometry constants
pub mod arrow {
    use super::*;

    /// Arrowhead side length in surface units
    pub const HEAD_SIZE: f32 = 10.0;
    /// Arrowhead half-angle from the shaft (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// The two back corners of the arrowhead triangle whose tip is `end`
    pub fn head_points(start: Point, end: Point, head_size: f32) -> (Point, Point) {
        let theta = angle(start, end);
        let corner = |a: f32| {
            Point::new(
                end.x - head_size * a.cos(),
                end.y - head_size * a.sin(),
            )
        };
        (corner(theta - HEAD_ANGLE), corner(theta + HEAD_ANGLE))
    }
}

/// Redaction constants
pub mod redact {
    /// Mosaic cell edge in pixels
    pub const MOSAIC_BLOCK_SIZE: u32 = 10;
    /// Blur radius (gaussian sigma) in pixels
    pub const BLUR_RADIUS: f32 = 10.0;
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(a: Point, b: Point) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
    let (min_y, max_y) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
    (min_x, min_y, max_x, max_y)
}
