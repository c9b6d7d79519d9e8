use decal_core::coords::clamp_size;
use decal_core::{ContainerSnapshot, Customization, ItemId};
use tracing::trace;

use crate::session::Pointer;

/// Resize gesture state. Axes are independent; there is no aspect-ratio lock.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    item: ItemId,
    start_pointer: Pointer,
    start_size: (f64, f64),
    min_size: f64,
    container: ContainerSnapshot,
}

impl ResizeSession {
    /// Returns `None` for missing items and for text, which is sized by its font.
    pub fn begin(
        model: &Customization,
        item: ItemId,
        pointer: Pointer,
        container: ContainerSnapshot,
    ) -> Option<Self> {
        let start_size = model.get(item)?.size()?;
        Some(Self {
            item,
            start_pointer: pointer,
            start_size,
            min_size: model.min_item_size(),
            container,
        })
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn container(&self) -> ContainerSnapshot {
        self.container
    }

    pub fn size_at(&self, pointer: Pointer) -> (f64, f64) {
        let (dx, dy) = self.container.to_relative(
            pointer.x - self.start_pointer.x,
            pointer.y - self.start_pointer.y,
        );
        (
            clamp_size(self.start_size.0 + dx, self.min_size),
            clamp_size(self.start_size.1 + dy, self.min_size),
        )
    }

    pub fn update(&self, model: &mut Customization, pointer: Pointer) -> bool {
        let (width, height) = self.size_at(pointer);
        trace!(item = %self.item, width, height, "Resize move");
        model.set_size(self.item, width, height)
    }
}
