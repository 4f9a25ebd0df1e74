//! Diagram node geometry supplied by the diagram caller

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Axis-aligned node rectangle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRect {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeRect {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn edges(&self) -> NodeEdges {
        NodeEdges {
            left: self.x,
            right: self.x + self.width,
            top: self.y,
            bottom: self.y + self.height,
            center_x: self.x + self.width / 2.0,
            center_y: self.y + self.height / 2.0,
        }
    }

    pub fn center(&self) -> Point {
        let edges = self.edges();
        Point::new(edges.center_x, edges.center_y)
    }
}

/// The six reference lines of a node used for anchoring and alignment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeEdges {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub center_x: f32,
    pub center_y: f32,
}

/// Named attachment side of a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl PortSide {
    /// Parse a side name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<PortSide> {
        match name {
            "top" => Some(PortSide::Top),
            "right" => Some(PortSide::Right),
            "bottom" => Some(PortSide::Bottom),
            "left" => Some(PortSide::Left),
            _ => None,
        }
    }
}

/// Snap coordinates per reference line; `None` means no peer within threshold
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlignmentResult {
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
}

impl AlignmentResult {
    pub fn is_empty(&self) -> bool {
        *self == AlignmentResult::default()
    }
}
