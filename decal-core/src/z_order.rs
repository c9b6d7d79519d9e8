/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Reordering algebra over the global paint order.
//!
//! Reordering only rewrites the target's zIndex relative to its neighbour in the sorted order
//! and never renumbers other layers. Values may therefore drift or collide; only their relative
//! order matters. [`Customization::normalize_z_order`] compacts them back to `1..=n`.

use serde::Serialize;
use tracing::debug;

use crate::{Customization, ItemId};

/// Which reorder actions make sense for a layer right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZOrderState {
    pub can_bring_forward: bool,
    pub can_bring_to_front: bool,
    pub can_send_backward: bool,
    pub can_send_to_back: bool,
    pub show_layer_option: bool,
}

impl Customization {
    fn sorted_ids(&self) -> Vec<(ItemId, i64)> {
        self.paint_order()
            .into_iter()
            .map(|layer| (layer.id, layer.z_index))
            .collect()
    }

    fn set_z_index(&mut self, id: ItemId, z_index: i64) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                debug!(%id, from = layer.z_index, to = z_index, "Reordered layer");
                layer.z_index = z_index;
                true
            }
            None => false,
        }
    }

    /// Places `id` just above its upper neighbour. Returns `false` if it is already on top.
    pub fn bring_forward(&mut self, id: ItemId) -> bool {
        let sorted = self.sorted_ids();
        let Some(pos) = sorted.iter().position(|(i, _)| *i == id) else {
            return false;
        };
        match sorted.get(pos + 1) {
            Some(&(_, above)) => self.set_z_index(id, above.saturating_add(1)),
            None => false,
        }
    }

    /// Places `id` just below its lower neighbour. Returns `false` if it is already at the bottom.
    pub fn send_backward(&mut self, id: ItemId) -> bool {
        let sorted = self.sorted_ids();
        let Some(pos) = sorted.iter().position(|(i, _)| *i == id) else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        let below = sorted[pos - 1].1;
        self.set_z_index(id, below.saturating_sub(1))
    }

    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        match self.max_z_index() {
            Some(max) if self.contains(id) => self.set_z_index(id, max.saturating_add(1)),
            _ => false,
        }
    }

    pub fn send_to_back(&mut self, id: ItemId) -> bool {
        match self.min_z_index() {
            Some(min) if self.contains(id) => self.set_z_index(id, min.saturating_sub(1)),
            _ => false,
        }
    }

    pub fn z_order_state(&self, id: ItemId) -> ZOrderState {
        let sorted = self.sorted_ids();
        if sorted.len() < 2 {
            return ZOrderState::default();
        }
        let Some(pos) = sorted.iter().position(|(i, _)| *i == id) else {
            return ZOrderState::default();
        };
        let not_last = pos + 1 < sorted.len();
        let not_first = pos > 0;
        ZOrderState {
            can_bring_forward: not_last,
            can_bring_to_front: not_last,
            can_send_backward: not_first,
            can_send_to_back: not_first,
            show_layer_option: true,
        }
    }

    /// Renumbers every layer to `1..=n` in current paint order.
    pub fn normalize_z_order(&mut self) {
        let sorted = self.sorted_ids();
        for (rank, (id, _)) in sorted.into_iter().enumerate() {
            if let Some(layer) = self.get_mut(id) {
                layer.z_index = rank as i64 + 1;
            }
        }
        debug!(layers = self.len(), "Normalized z-order");
    }
}
