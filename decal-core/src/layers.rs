/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

use tracing::debug;

use crate::coords::{clamp_percent, clamp_size};
use crate::{Item, ItemId, ItemKind, Layer, MIN_ITEM_SIZE};

/// The layers of one cart or order line item.
///
/// Layers are kept in insertion order. Every mutator clamps what it commits, so positions
/// stay within [0, 100] and shape/image sizes never drop below the minimum item size.
#[derive(Debug, Clone, PartialEq)]
pub struct Customization {
    layers: Vec<Layer>,
    next_id: u64,
    min_item_size: f64,
}

impl Default for Customization {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial text style update. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<String>,
}

impl Customization {
    pub fn new() -> Self {
        Self::with_min_item_size(MIN_ITEM_SIZE)
    }

    pub fn with_min_item_size(min_item_size: f64) -> Self {
        Self {
            layers: Vec::new(),
            next_id: 1,
            min_item_size,
        }
    }

    pub fn min_item_size(&self) -> f64 {
        self.min_item_size
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers in insertion order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn texts(&self) -> impl Iterator<Item = &Layer> {
        self.of_kind(ItemKind::Text)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Layer> {
        self.of_kind(ItemKind::Shape)
    }

    pub fn images(&self) -> impl Iterator<Item = &Layer> {
        self.of_kind(ItemKind::Image)
    }

    fn of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |layer| layer.kind() == kind)
    }

    pub fn get(&self, id: ItemId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn max_z_index(&self) -> Option<i64> {
        self.layers.iter().map(|layer| layer.z_index).max()
    }

    pub fn min_z_index(&self) -> Option<i64> {
        self.layers.iter().map(|layer| layer.z_index).min()
    }

    /// Adds a layer on top of everything else (`max + 1`, or `1` when empty).
    pub fn insert(&mut self, item: Item, relative_x: f64, relative_y: f64) -> ItemId {
        let z_index = self.max_z_index().map_or(1, |max| max.saturating_add(1));
        let id = self.push_layer(item, relative_x, relative_y, z_index);
        debug!(%id, z_index, "Added layer");
        id
    }

    /// Appends a layer with an explicit zIndex, clamping position and size.
    pub(crate) fn push_layer(
        &mut self,
        mut item: Item,
        relative_x: f64,
        relative_y: f64,
        z_index: i64,
    ) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;

        let min = self.min_item_size;
        match &mut item {
            Item::Shape(shape) => {
                shape.width = clamp_size(shape.width, min);
                shape.height = clamp_size(shape.height, min);
            }
            Item::Image(img) => {
                img.width = clamp_size(img.width, min);
                img.height = clamp_size(img.height, min);
            }
            Item::Text(_) => {}
        }

        self.layers.push(Layer {
            id,
            relative_x: clamp_percent(relative_x),
            relative_y: clamp_percent(relative_y),
            z_index,
            item,
        });
        id
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Layer> {
        let idx = self.layers.iter().position(|layer| layer.id == id)?;
        debug!(%id, "Removed layer");
        Some(self.layers.remove(idx))
    }

    /// Moves an item's center, clamped into the container.
    pub fn set_position(&mut self, id: ItemId, relative_x: f64, relative_y: f64) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                layer.relative_x = clamp_percent(relative_x);
                layer.relative_y = clamp_percent(relative_y);
                true
            }
            None => false,
        }
    }

    /// Resizes a shape or image. Text layers are not resizable and return `false`.
    pub fn set_size(&mut self, id: ItemId, width: f64, height: f64) -> bool {
        let min = self.min_item_size;
        let Some(layer) = self.get_mut(id) else {
            return false;
        };
        let (w, h) = match &mut layer.item {
            Item::Shape(shape) => (&mut shape.width, &mut shape.height),
            Item::Image(img) => (&mut img.width, &mut img.height),
            Item::Text(_) => return false,
        };
        *w = clamp_size(width, min);
        *h = clamp_size(height, min);
        true
    }

    pub fn set_text_value(&mut self, id: ItemId, value: impl Into<String>) -> bool {
        match self.get_mut(id).map(|layer| &mut layer.item) {
            Some(Item::Text(text)) => {
                text.value = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_text_style(&mut self, id: ItemId, style: TextStyle) -> bool {
        let Some(Item::Text(text)) = self.get_mut(id).map(|layer| &mut layer.item) else {
            return false;
        };
        if let Some(size) = style.font_size.filter(|s| s.is_finite()) {
            text.font_size = size.max(1.0);
        }
        if let Some(family) = style.font_family {
            text.font_family = family;
        }
        if let Some(color) = style.color {
            text.color = color;
        }
        true
    }

    /// Recolors a text or shape layer. Images carry no color.
    pub fn set_color(&mut self, id: ItemId, color: impl Into<String>) -> bool {
        match self.get_mut(id).map(|layer| &mut layer.item) {
            Some(Item::Text(text)) => text.color = color.into(),
            Some(Item::Shape(shape)) => shape.color = color.into(),
            _ => return false,
        }
        true
    }

    /// Layers in paint order: ascending zIndex, ties in `texts ++ elements ++ images` order.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut sorted: Vec<&Layer> = self.layers.iter().collect();
        sorted.sort_by_key(|layer| (layer.z_index, layer.kind().rank()));
        sorted
    }
}
