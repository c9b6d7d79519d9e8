use decal_core::coords::clamp_percent;
use decal_core::{ContainerSnapshot, Customization, ItemId};
use tracing::trace;

use crate::session::Pointer;

/// Move gesture state captured at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    item: ItemId,
    start_pointer: Pointer,
    start_relative: (f64, f64),
    container: ContainerSnapshot,
}

impl DragSession {
    pub fn begin(
        model: &Customization,
        item: ItemId,
        pointer: Pointer,
        container: ContainerSnapshot,
    ) -> Option<Self> {
        let layer = model.get(item)?;
        Some(Self {
            item,
            start_pointer: pointer,
            start_relative: (layer.relative_x, layer.relative_y),
            container,
        })
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn container(&self) -> ContainerSnapshot {
        self.container
    }

    /// Position for `pointer`, clamped into [0, 100].
    pub fn position_at(&self, pointer: Pointer) -> (f64, f64) {
        let (dx, dy) = self.container.to_relative(
            pointer.x - self.start_pointer.x,
            pointer.y - self.start_pointer.y,
        );
        (
            clamp_percent(self.start_relative.0 + dx),
            clamp_percent(self.start_relative.1 + dy),
        )
    }

    /// Writes the new position straight into the model for live preview.
    pub fn update(&self, model: &mut Customization, pointer: Pointer) -> bool {
        let (x, y) = self.position_at(pointer);
        trace!(item = %self.item, x, y, "Drag move");
        model.set_position(self.item, x, y)
    }
}
