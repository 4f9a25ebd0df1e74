//! Screenshot annotation and diagram connector geometry
//!
//! - `annotations`: pointer-driven annotation tool over a raster surface
//! - `render`: rasterizing annotations, mosaic and blur, connectors
//! - `diagram`: ports, connector paths, alignment guides
//! - `capture`: rasterizer boundary and screenshot tool

pub mod annotations;
pub mod capture;
pub mod config;
pub mod diagram;
pub mod domain;
pub mod export;
pub mod render;
pub mod surface;

pub use annotations::{AnnotationTool, ToolMsg, handle_tool_msg};
pub use capture::{CaptureRequest, Rasterizer, ScreenshotImage, ScreenshotTool};
pub use config::{EditorConfig, ExportFormat, ShapeColor, StyleUpdate, Tool, ToolStyle};
pub use domain::{Annotation, NodeRect, Point, Rect};
pub use surface::{ImageSurface, RasterSurface};
