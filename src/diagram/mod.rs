//! Diagram connection geometry
//!
//! - Port anchors on node rectangles (port.rs)
//! - Curved and orthogonal connector paths, hit testing (path.rs)
//! - Alignment guides and grid snapping for node drags (alignment.rs)

pub mod alignment;
pub mod path;
pub mod port;

pub use alignment::{detect_alignment, snap_to_grid};
pub use path::{ConnectorPath, PathCommand, RouteDirection, curved_path, is_point_on_path, orthogonal_path};
pub use port::{connection_points, resolve_port, resolve_port_named};
