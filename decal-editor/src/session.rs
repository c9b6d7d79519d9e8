use decal_core::ItemId;

use crate::drag::DragSession;
use crate::resize::ResizeSession;

/// Pointer position in page pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The single pointer gesture in flight, owned by the editor.
///
/// Only one variant can be live at a time, so a drag and a resize can never interleave and
/// a gesture can only ever touch the item it started on.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionSession {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl InteractionSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionSession::Idle)
    }

    pub fn item(&self) -> Option<ItemId> {
        match self {
            InteractionSession::Idle => None,
            InteractionSession::Dragging(drag) => Some(drag.item()),
            InteractionSession::Resizing(resize) => Some(resize.item()),
        }
    }

    pub fn is_dragging(&self, id: ItemId) -> bool {
        matches!(self, InteractionSession::Dragging(drag) if drag.item() == id)
    }
}
