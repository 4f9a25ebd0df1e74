//! Message types for the annotation tool
//!
//! Hosts translate their own input events into these and feed them to
//! [`handle_tool_msg`](super::handlers::handle_tool_msg).

use crate::config::{StyleUpdate, Tool};
use crate::domain::Point;

// ============================================================================
// Pointer Types
// ============================================================================

/// Pointer action over the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Button pressed at position
    Down(Point),
    /// Pointer moved to position
    Move(Point),
    /// Button released at position
    Up(Point),
    /// Pointer left the surface
    Leave,
}

/// Keys the inline text field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Enter,
    Escape,
}

/// Inline text field events
#[derive(Debug, Clone, PartialEq)]
pub enum TextMsg {
    /// Field content replaced
    Input(String),
    Key(TextKey),
    FocusLost,
}

// ============================================================================
// Tool Messages
// ============================================================================

/// All annotation tool messages
#[derive(Debug, Clone, PartialEq)]
pub enum ToolMsg {
    /// Pointer events, in viewport coordinates
    Pointer(PointerAction),
    Text(TextMsg),
    /// Select tool by name
    SetTool(String),
    SelectTool(Tool),
    SetStyle(StyleUpdate),
    /// Remove every annotation
    ClearAll,
    Redraw,
    Attach,
    Detach,
}
