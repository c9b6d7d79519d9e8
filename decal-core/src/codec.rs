/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! The persisted customization document.
//!
//! Only persisted fields are written: ids, selection, edit buffers and interaction sessions
//! never leave the editor. Decoding rebuilds a [`Customization`] with fresh ids, appending
//! texts, then elements, then images so ties in zIndex paint exactly as they did when encoded.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{DecodePolicy, EngineConfig};
use crate::error::CodecError;
use crate::{Customization, ImageItem, Item, ShapeItem, ShapeKind, TextItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub texts: Vec<TextRecord>,
    #[serde(default)]
    pub elements: Vec<ShapeRecord>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub value: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub relative_x: f64,
    pub relative_y: f64,
    pub z_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub shape: ShapeKind,
    pub color: String,
    pub width: f64,
    pub height: f64,
    pub relative_x: f64,
    pub relative_y: f64,
    pub z_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub url: String,
    pub width: f64,
    pub height: f64,
    pub relative_x: f64,
    pub relative_y: f64,
    pub z_index: i64,
}

impl Document {
    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.elements.is_empty() && self.images.is_empty()
    }
}

pub fn encode(customization: &Customization) -> Document {
    let mut doc = Document::default();
    for layer in customization.layers() {
        let (relative_x, relative_y, z_index) = (layer.relative_x, layer.relative_y, layer.z_index);
        match &layer.item {
            Item::Text(text) => doc.texts.push(TextRecord {
                value: text.value.clone(),
                font_size: text.font_size,
                font_family: text.font_family.clone(),
                color: text.color.clone(),
                relative_x,
                relative_y,
                z_index,
            }),
            Item::Shape(shape) => doc.elements.push(ShapeRecord {
                shape: shape.shape,
                color: shape.color.clone(),
                width: shape.width,
                height: shape.height,
                relative_x,
                relative_y,
                z_index,
            }),
            Item::Image(img) => doc.images.push(ImageRecord {
                url: img.url.clone(),
                width: img.width,
                height: img.height,
                relative_x,
                relative_y,
                z_index,
            }),
        }
    }
    doc
}

struct Bounds {
    policy: DecodePolicy,
    min_size: f64,
}

impl Bounds {
    fn finite(field: &'static str, value: f64) -> Result<f64, CodecError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CodecError::NonFinite { field })
        }
    }

    fn coerce(&self, field: &'static str, value: f64, lo: f64, hi: f64) -> Result<f64, CodecError> {
        let value = Self::finite(field, value)?;
        if (lo..=hi).contains(&value) {
            return Ok(value);
        }
        match self.policy {
            DecodePolicy::Strict => Err(CodecError::OutOfRange { field, value }),
            DecodePolicy::Coerce => {
                let clamped = value.clamp(lo, hi);
                warn!(field, value, clamped, "Coerced out-of-range value in document");
                Ok(clamped)
            }
        }
    }

    fn position(&self, x: f64, y: f64) -> Result<(f64, f64), CodecError> {
        Ok((
            self.coerce("relativeX", x, 0.0, 100.0)?,
            self.coerce("relativeY", y, 0.0, 100.0)?,
        ))
    }

    fn size(&self, w: f64, h: f64) -> Result<(f64, f64), CodecError> {
        Ok((
            self.coerce("width", w, self.min_size, f64::MAX)?,
            self.coerce("height", h, self.min_size, f64::MAX)?,
        ))
    }
}

/// Rebuilds a customization from a document.
///
/// Unknown shapes and missing fields already fail while parsing JSON. Non-finite numbers are
/// always rejected; out-of-range positions and sizes follow `config.decode_policy`.
pub fn decode(doc: &Document, config: &EngineConfig) -> Result<Customization, CodecError> {
    let bounds = Bounds {
        policy: config.decode_policy,
        min_size: config.min_item_size,
    };
    let mut customization = Customization::with_min_item_size(config.min_item_size);

    for record in &doc.texts {
        let (x, y) = bounds.position(record.relative_x, record.relative_y)?;
        let font_size = bounds.coerce("fontSize", record.font_size, 1.0, f64::MAX)?;
        let item = Item::Text(TextItem {
            value: record.value.clone(),
            font_size,
            font_family: record.font_family.clone(),
            color: record.color.clone(),
        });
        customization.push_layer(item, x, y, record.z_index);
    }

    for record in &doc.elements {
        let (x, y) = bounds.position(record.relative_x, record.relative_y)?;
        let (width, height) = bounds.size(record.width, record.height)?;
        let item = Item::Shape(ShapeItem {
            shape: record.shape,
            color: record.color.clone(),
            width,
            height,
        });
        customization.push_layer(item, x, y, record.z_index);
    }

    for record in &doc.images {
        let (x, y) = bounds.position(record.relative_x, record.relative_y)?;
        let (width, height) = bounds.size(record.width, record.height)?;
        let item = Item::Image(ImageItem {
            url: record.url.clone(),
            width,
            height,
        });
        customization.push_layer(item, x, y, record.z_index);
    }

    Ok(customization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemId;

    const SAMPLE: &str = r##"{
        "texts": [
            { "value": "Team 7", "fontSize": 22, "fontFamily": "Arial", "color": "#ffffff",
              "relativeX": 50, "relativeY": 20, "zIndex": 3 }
        ],
        "elements": [
            { "shape": "star", "color": "#ffcc00", "width": 48, "height": 48,
              "relativeX": 80, "relativeY": 80, "zIndex": 1 }
        ],
        "images": [
            { "url": "https://cdn.example.com/logo.png", "width": 20, "height": 10,
              "relativeX": 25, "relativeY": 60, "zIndex": 2 }
        ]
    }"##;

    #[test]
    fn parses_the_wire_format() {
        let doc = Document::from_json_str(SAMPLE).expect("valid document");
        assert_eq!(doc.texts[0].font_size, 22.0);
        assert_eq!(doc.elements[0].shape, ShapeKind::Star);
        assert_eq!(doc.images[0].z_index, 2);
    }

    #[test]
    fn encode_writes_camel_case_and_no_transient_fields() {
        let doc = Document::from_json_str(SAMPLE).unwrap();
        let model = decode(&doc, &EngineConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::to_value(encode(&model)).unwrap();

        let text = &json["texts"][0];
        assert!(text.get("fontSize").is_some());
        assert!(text.get("relativeX").is_some());
        assert!(text.get("zIndex").is_some());
        assert!(text.get("id").is_none());
        assert!(text.get("editing").is_none());
        assert_eq!(json["elements"][0]["shape"], "star");
    }

    #[test]
    fn decode_preserves_paint_order() {
        let doc = Document::from_json_str(SAMPLE).unwrap();
        let model = decode(&doc, &EngineConfig::default()).unwrap();
        let kinds: Vec<i64> = model.paint_order().iter().map(|l| l.z_index).collect();
        assert_eq!(kinds, vec![1, 2, 3]);
        assert_eq!(encode(&model), doc);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let doc = Document::from_json_str(r#"{ "texts": [] }"#).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn unknown_shapes_and_missing_fields_are_rejected() {
        let bad_shape = r##"{ "elements": [ { "shape": "hexagon", "color": "#000000", "width": 10,
            "height": 10, "relativeX": 1, "relativeY": 1, "zIndex": 1 } ] }"##;
        assert!(matches!(Document::from_json_str(bad_shape), Err(CodecError::Json(_))));

        let missing = r#"{ "images": [ { "url": "x", "width": 10, "height": 10 } ] }"#;
        assert!(Document::from_json_str(missing).is_err());
    }

    #[test]
    fn coerce_policy_clamps_out_of_range_values() {
        let mut doc = Document::from_json_str(SAMPLE).unwrap();
        doc.images[0].relative_x = 140.0;
        doc.images[0].width = 1.0;
        doc.texts[0].relative_y = -3.0;

        let model = decode(&doc, &EngineConfig::default()).unwrap();
        let img = model.images().next().unwrap();
        assert_eq!(img.relative_x, 100.0);
        assert_eq!(img.size(), Some((5.0, 10.0)));
        assert_eq!(model.texts().next().unwrap().relative_y, 0.0);
    }

    #[test]
    fn strict_policy_rejects_out_of_range_values() {
        let mut doc = Document::from_json_str(SAMPLE).unwrap();
        doc.elements[0].height = 2.0;
        let config = EngineConfig {
            decode_policy: DecodePolicy::Strict,
            ..EngineConfig::default()
        };
        match decode(&doc, &config) {
            Err(CodecError::OutOfRange { field, value }) => {
                assert_eq!(field, "height");
                assert_eq!(value, 2.0);
            }
            other => panic!("expected out of range, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_are_always_rejected() {
        let mut doc = Document::from_json_str(SAMPLE).unwrap();
        doc.texts[0].relative_x = f64::NAN;
        assert!(matches!(
            decode(&doc, &EngineConfig::default()),
            Err(CodecError::NonFinite { field: "relativeX" })
        ));
    }

    #[test]
    fn decoded_ids_are_fresh_and_distinct() {
        let doc = Document::from_json_str(SAMPLE).unwrap();
        let model = decode(&doc, &EngineConfig::default()).unwrap();
        let mut ids: Vec<ItemId> = model.layers().iter().map(|l| l.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
