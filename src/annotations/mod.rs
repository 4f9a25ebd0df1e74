//! Interactive annotation authoring
//!
//! This module provides:
//! - The annotation tool state machine over a raster surface
//! - Message types for host input events
//! - Message handlers for ToolMsg

pub mod handlers;
pub mod messages;
pub mod tool;

pub use handlers::handle_tool_msg;
pub use messages::{PointerAction, TextKey, TextMsg, ToolMsg};
pub use tool::{AnnotationTool, InputState, TextEdit};
