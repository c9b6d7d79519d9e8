/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Layer model for product customizations.
//!
//! A [`Customization`] is the ordered set of text, shape and image layers placed on top of a
//! product image. Positions and sizes are percentages of the container, so the same
//! composition can be redisplayed at any viewport size.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod codec;
pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod paint;
pub mod z_order;

pub use codec::{decode, encode, Document, ImageRecord, ShapeRecord, TextRecord};
pub use config::{DecodePolicy, EngineConfig};
pub use coords::{to_absolute, to_relative, ContainerSnapshot};
pub use error::{CodecError, ConfigError};
pub use layers::{Customization, TextStyle};
pub use paint::{
    paint_list, render, Frame, GlyphRun, PaintEntry, PaintList, RenderMode, SelectionOverlay,
    ViewState, Visual,
};
pub use z_order::ZOrderState;

/// Smallest width/height a shape or image may have, in percent of the container.
pub const MIN_ITEM_SIZE: f64 = 5.0;

/// Session-stable identifier of a layer. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Shape,
    Image,
}

impl ItemKind {
    /// Position of the kind's collection in `texts ++ elements ++ images`.
    pub(crate) fn rank(self) -> u8 {
        match self {
            ItemKind::Text => 0,
            ItemKind::Shape => 1,
            ItemKind::Image => 2,
        }
    }
}

/// One placed layer. `relative_x`/`relative_y` locate the item's center.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: ItemId,
    pub relative_x: f64,
    pub relative_y: f64,
    pub z_index: i64,
    pub item: Item,
}

impl Layer {
    pub fn kind(&self) -> ItemKind {
        self.item.kind()
    }

    /// Width and height for resizable items. Text is sized by its font.
    pub fn size(&self) -> Option<(f64, f64)> {
        match &self.item {
            Item::Text(_) => None,
            Item::Shape(shape) => Some((shape.width, shape.height)),
            Item::Image(img) => Some((img.width, img.height)),
        }
    }

    pub fn is_resizable(&self) -> bool {
        self.size().is_some()
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match &self.item {
            Item::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(TextItem),
    Shape(ShapeItem),
    Image(ImageItem),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Text(_) => ItemKind::Text,
            Item::Shape(_) => ItemKind::Shape,
            Item::Image(_) => ItemKind::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub value: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeItem {
    pub shape: ShapeKind,
    pub color: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    /// Transient local reference or permanent URL, never interpreted here.
    pub url: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Heart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Heart => "heart",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
