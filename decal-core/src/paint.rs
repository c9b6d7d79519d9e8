/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Paint list construction.
//!
//! [`paint_list`] turns the layer model into what a backend draws, bottom to top. The
//! selection overlay is produced separately and never enters the paint list or a document.

use crate::geometry::PathVerb;
use crate::z_order::ZOrderState;
use crate::{Customization, Item, ItemId, Layer, ShapeKind};

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Text(GlyphRun),
    /// A text layer in edit mode, shown as an input holding the uncommitted buffer.
    TextInput(GlyphRun),
    Shape {
        kind: ShapeKind,
        color: String,
        outline: &'static [PathVerb],
    },
    /// Bitmap stretched to the layer's box.
    Image { url: String },
}

/// One visual in paint order. Coordinates are percentages of the container.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintEntry {
    pub id: ItemId,
    pub z_index: i64,
    pub center: (f64, f64),
    /// `None` for text, which takes its intrinsic size.
    pub size: Option<(f64, f64)>,
    pub visual: Visual,
}

impl PaintEntry {
    /// Top-left corner of the entry's box, when it has one.
    pub fn origin(&self) -> Option<(f64, f64)> {
        self.size
            .map(|(w, h)| (self.center.0 - w / 2.0, self.center.1 - h / 2.0))
    }
}

pub type PaintList = Vec<PaintEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Interactive,
    /// Redisplay in a cart or order view: no handlers, no overlay.
    ReadOnly,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState<'a> {
    pub selected: Option<ItemId>,
    pub editing: Option<(ItemId, &'a str)>,
    pub mode: RenderMode,
}

/// Controls drawn around the selected layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOverlay {
    pub id: ItemId,
    pub center: (f64, f64),
    pub size: Option<(f64, f64)>,
    pub resize_handle: bool,
    pub delete_control: bool,
    pub layer_menu: ZOrderState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub paint: PaintList,
    pub overlay: Option<SelectionOverlay>,
}

fn glyph_run(text: &crate::TextItem, content: &str) -> GlyphRun {
    GlyphRun {
        text: content.to_string(),
        font_size: text.font_size,
        font_family: text.font_family.clone(),
        color: text.color.clone(),
    }
}

fn paint_entry(layer: &Layer, editing: Option<(ItemId, &str)>) -> PaintEntry {
    let visual = match &layer.item {
        Item::Text(text) => match editing {
            Some((id, buffer)) if id == layer.id => Visual::TextInput(glyph_run(text, buffer)),
            _ => Visual::Text(glyph_run(text, &text.value)),
        },
        Item::Shape(shape) => Visual::Shape {
            kind: shape.shape,
            color: shape.color.clone(),
            outline: shape.shape.outline(),
        },
        Item::Image(img) => Visual::Image { url: img.url.clone() },
    };
    PaintEntry {
        id: layer.id,
        z_index: layer.z_index,
        center: (layer.relative_x, layer.relative_y),
        size: layer.size(),
        visual,
    }
}

pub fn paint_list(customization: &Customization) -> PaintList {
    customization
        .paint_order()
        .into_iter()
        .map(|layer| paint_entry(layer, None))
        .collect()
}

pub fn render(customization: &Customization, view: &ViewState<'_>) -> Frame {
    let read_only = view.mode == RenderMode::ReadOnly;
    let editing = if read_only { None } else { view.editing };

    let paint = customization
        .paint_order()
        .into_iter()
        .map(|layer| paint_entry(layer, editing))
        .collect();

    let overlay = view
        .selected
        .filter(|_| !read_only)
        .and_then(|id| customization.get(id))
        .map(|layer| SelectionOverlay {
            id: layer.id,
            center: (layer.relative_x, layer.relative_y),
            size: layer.size(),
            resize_handle: layer.is_resizable(),
            delete_control: true,
            layer_menu: customization.z_order_state(layer.id),
        });

    Frame { paint, overlay }
}
