//! Alignment guides for node drags

use crate::domain::{AlignmentResult, NodeRect, Point};

/// Default snap distance in surface units
pub const DEFAULT_SNAP_THRESHOLD: f32 = 5.0;
/// Default grid spacing for [`snap_to_grid`]
pub const DEFAULT_GRID_SIZE: f32 = 20.0;

/// Compare the six reference lines of `dragged` against every peer
///
/// A line within `threshold` of the same line on a peer records that peer's
/// coordinate. The dragged node itself (same id) is skipped. When several
/// peers match the same line the last one wins.
pub fn detect_alignment(dragged: &NodeRect, peers: &[NodeRect], threshold: f32) -> AlignmentResult {
    let mut result = AlignmentResult::default();
    let d = dragged.edges();

    let snap = |slot: &mut Option<f32>, ours: f32, theirs: f32| {
        if (ours - theirs).abs() <= threshold {
            *slot = Some(theirs);
        }
    };

    for peer in peers.iter().filter(|peer| peer.id != dragged.id) {
        let p = peer.edges();
        snap(&mut result.left, d.left, p.left);
        snap(&mut result.right, d.right, p.right);
        snap(&mut result.top, d.top, p.top);
        snap(&mut result.bottom, d.bottom, p.bottom);
        snap(&mut result.center_x, d.center_x, p.center_x);
        snap(&mut result.center_y, d.center_y, p.center_y);
    }

    result
}

/// Round a position to the nearest grid intersection
pub fn snap_to_grid(point: Point, grid_size: f32) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}
