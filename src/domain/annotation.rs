//! Annotation types for drawing on a raster surface
//!
//! All annotation types store coordinates in surface coordinates.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use crate::config::{ShapeColor, Tool, ToolStyle};

/// Stroked shape between two drag points (arrow, line)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeAnnotation {
    pub start: Point,
    pub end: Point,
    pub color: ShapeColor,
    pub line_width: f32,
}

/// Outlined, optionally filled shape (rectangle, circle)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeAnnotation {
    pub start: Point,
    pub end: Point,
    pub stroke: ShapeColor,
    /// Not drawn when transparent
    pub fill: ShapeColor,
    pub line_width: f32,
}

/// Single line of text anchored at its baseline origin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(alias = "start")]
    pub position: Point,
    pub text: String,
    pub color: ShapeColor,
    pub font_size: f32,
    pub font_family: String,
}

/// Region obscured by a destructive pixel transform (mosaic, blur)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionAnnotation {
    pub start: Point,
    pub end: Point,
}

/// Unified annotation type; log order is draw order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Arrow(StrokeAnnotation),
    Line(StrokeAnnotation),
    Rectangle(ShapeAnnotation),
    Circle(ShapeAnnotation),
    Text(TextAnnotation),
    Mosaic(RegionAnnotation),
    Blur(RegionAnnotation),
}

impl Annotation {
    /// Provisional annotation for a drag starting at `start`
    ///
    /// Returns `None` for the text tool, which is authored through a text
    /// edit instead of a drag.
    pub fn begin_drag(tool: Tool, start: Point, style: &ToolStyle) -> Option<Annotation> {
        let stroke = || StrokeAnnotation {
            start,
            end: start,
            color: style.stroke_color,
            line_width: style.line_width,
        };
        let shape = || ShapeAnnotation {
            start,
            end: start,
            stroke: style.stroke_color,
            fill: style.fill_color,
            line_width: style.line_width,
        };
        let region = || RegionAnnotation { start, end: start };

        match tool {
            Tool::Arrow => Some(Annotation::Arrow(stroke())),
            Tool::Line => Some(Annotation::Line(stroke())),
            Tool::Rectangle => Some(Annotation::Rectangle(shape())),
            Tool::Circle => Some(Annotation::Circle(shape())),
            Tool::Mosaic => Some(Annotation::Mosaic(region())),
            Tool::Blur => Some(Annotation::Blur(region())),
            Tool::Text => None,
        }
    }

    /// Text annotation with the current style
    pub fn text(position: Point, text: String, style: &ToolStyle) -> Annotation {
        Annotation::Text(TextAnnotation {
            position,
            text,
            color: style.stroke_color,
            font_size: style.font_size,
            font_family: style.font_family.clone(),
        })
    }

    pub fn tool(&self) -> Tool {
        match self {
            Annotation::Arrow(_) => Tool::Arrow,
            Annotation::Line(_) => Tool::Line,
            Annotation::Rectangle(_) => Tool::Rectangle,
            Annotation::Circle(_) => Tool::Circle,
            Annotation::Text(_) => Tool::Text,
            Annotation::Mosaic(_) => Tool::Mosaic,
            Annotation::Blur(_) => Tool::Blur,
        }
    }

    pub fn start(&self) -> Point {
        match self {
            Annotation::Arrow(a) | Annotation::Line(a) => a.start,
            Annotation::Rectangle(s) | Annotation::Circle(s) => s.start,
            Annotation::Text(t) => t.position,
            Annotation::Mosaic(r) | Annotation::Blur(r) => r.start,
        }
    }

    /// Second drag point; text has none
    pub fn end(&self) -> Option<Point> {
        match self {
            Annotation::Arrow(a) | Annotation::Line(a) => Some(a.end),
            Annotation::Rectangle(s) | Annotation::Circle(s) => Some(s.end),
            Annotation::Text(_) => None,
            Annotation::Mosaic(r) | Annotation::Blur(r) => Some(r.end),
        }
    }

    /// Move the drag end point; no-op for text
    pub fn set_end(&mut self, end: Point) {
        match self {
            Annotation::Arrow(a) | Annotation::Line(a) => a.end = end,
            Annotation::Rectangle(s) | Annotation::Circle(s) => s.end = end,
            Annotation::Text(_) => {}
            Annotation::Mosaic(r) | Annotation::Blur(r) => r.end = end,
        }
    }

    /// Check if this is a redaction annotation (mosaic, blur)
    pub fn is_redaction(&self) -> bool {
        self.tool().is_redaction()
    }
}
