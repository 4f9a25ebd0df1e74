//! Annotation message handlers
//!
//! Routes ToolMsg to the annotation tool.

use super::messages::{PointerAction, TextKey, TextMsg, ToolMsg};
use super::tool::AnnotationTool;
use crate::surface::RasterSurface;

/// Handle a ToolMsg, modifying tool state
pub fn handle_tool_msg<S: RasterSurface + ?Sized>(tool: &mut AnnotationTool<'_, S>, msg: ToolMsg) {
    match msg {
        ToolMsg::Pointer(action) => handle_pointer(tool, action),
        ToolMsg::Text(msg) => handle_text(tool, msg),
        ToolMsg::SetTool(name) => {
            tool.set_tool_by_name(&name);
        }
        ToolMsg::SelectTool(selected) => tool.set_tool(selected),
        ToolMsg::SetStyle(update) => tool.set_style(update),
        ToolMsg::ClearAll => tool.clear_all(),
        ToolMsg::Redraw => tool.redraw(),
        ToolMsg::Attach => {
            if !tool.attach() {
                log::debug!("Annotation tool already attached");
            }
        }
        ToolMsg::Detach => {
            tool.detach();
        }
    }
}

fn handle_pointer<S: RasterSurface + ?Sized>(tool: &mut AnnotationTool<'_, S>, action: PointerAction) {
    match action {
        PointerAction::Down(pos) => tool.pointer_down(pos),
        PointerAction::Move(pos) => tool.pointer_move(pos),
        PointerAction::Up(pos) => tool.pointer_up(pos),
        PointerAction::Leave => tool.pointer_leave(),
    }
}

fn handle_text<S: RasterSurface + ?Sized>(tool: &mut AnnotationTool<'_, S>, msg: TextMsg) {
    match msg {
        TextMsg::Input(text) => match tool.text_edit_mut() {
            Some(edit) => edit.set_text(text),
            None => log::trace!("Text input with no active text edit"),
        },
        TextMsg::Key(TextKey::Enter) => tool.confirm_text(),
        TextMsg::Key(TextKey::Escape) => tool.cancel_text(),
        TextMsg::FocusLost => tool.text_focus_lost(),
    }
}
