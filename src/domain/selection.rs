//! Drag-to-select rectangle for custom-area capture

use super::geometry::{Point, Rect};

/// Sides must exceed this many pixels for a selection to count
pub const MIN_SELECTION_SIZE: i32 = 10;

/// Selection drag state
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum AreaSelection {
    #[default]
    Idle,
    /// Dragging from `origin`, currently at `current`
    Dragging { origin: Point, current: Point },
}

impl AreaSelection {
    pub fn press(&mut self, at: Point) {
        *self = AreaSelection::Dragging {
            origin: at,
            current: at,
        };
    }

    pub fn drag(&mut self, at: Point) {
        if let AreaSelection::Dragging { current, .. } = self {
            *current = at;
        }
    }

    /// Rectangle currently outlined by the drag
    pub fn current_rect(&self) -> Option<Rect> {
        match *self {
            AreaSelection::Idle => None,
            AreaSelection::Dragging { origin, current } => Some(Rect::from_corners(origin, current)),
        }
    }

    /// Finish the drag; small selections are dropped
    pub fn release(&mut self, at: Point) -> Option<Rect> {
        let AreaSelection::Dragging { origin, .. } = std::mem::take(self) else {
            return None;
        };
        let rect = Rect::from_corners(origin, at);
        if rect.width() > MIN_SELECTION_SIZE && rect.height() > MIN_SELECTION_SIZE {
            Some(rect)
        } else {
            log::debug!("Selection {rect:?} too small, ignoring");
            None
        }
    }

    /// Pointer left the overlay; any drag is abandoned
    pub fn cancel(&mut self) {
        *self = AreaSelection::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, AreaSelection::Dragging { .. })
    }
}
