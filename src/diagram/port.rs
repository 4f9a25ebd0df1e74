//! Port anchor resolution

use crate::domain::{NodeRect, Point, PortSide};

/// Anchor point of `side` on `node`; `None` resolves to the node center
pub fn resolve_port(node: &NodeRect, side: Option<PortSide>) -> Point {
    let edges = node.edges();
    match side {
        Some(PortSide::Top) => Point::new(edges.center_x, edges.top),
        Some(PortSide::Right) => Point::new(edges.right, edges.center_y),
        Some(PortSide::Bottom) => Point::new(edges.center_x, edges.bottom),
        Some(PortSide::Left) => Point::new(edges.left, edges.center_y),
        None => Point::new(edges.center_x, edges.center_y),
    }
}

/// Like [`resolve_port`] but takes the side by name
///
/// Connectors always need some anchor, so unknown names fall back to the
/// node center.
pub fn resolve_port_named(node: &NodeRect, side: &str) -> Point {
    let parsed = PortSide::from_name(side);
    if parsed.is_none() {
        log::debug!("Unknown port side {side:?} on node {}, using center", node.id);
    }
    resolve_port(node, parsed)
}

/// Both endpoints of a connector between two node ports
pub fn connection_points(
    start_node: &NodeRect,
    start_side: Option<PortSide>,
    end_node: &NodeRect,
    end_side: Option<PortSide>,
) -> (Point, Point) {
    (
        resolve_port(start_node, start_side),
        resolve_port(end_node, end_side),
    )
}
