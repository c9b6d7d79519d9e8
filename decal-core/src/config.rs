/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{ImageItem, ShapeItem, ShapeKind, TextItem, MIN_ITEM_SIZE};

/// How [`crate::decode`] treats values outside the model's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Clamp positions into [0, 100] and sizes up to the minimum.
    #[default]
    Coerce,
    /// Reject the document.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub min_item_size: f64,
    pub default_font_size: f64,
    pub default_font_family: String,
    pub default_text_color: String,
    pub default_text_value: String,
    pub default_shape_size: f64,
    pub default_shape_color: String,
    pub default_image_size: f64,
    pub default_position: (f64, f64),
    /// Dense zIndex renumbering after this many reorder operations. `None` never renumbers.
    pub renumber_every: Option<u32>,
    pub decode_policy: DecodePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_item_size: MIN_ITEM_SIZE,
            default_font_size: 22.0,
            default_font_family: "Arial".to_string(),
            default_text_color: "#000000".to_string(),
            default_text_value: "Your text".to_string(),
            default_shape_size: 48.0,
            default_shape_color: "#000000".to_string(),
            default_image_size: 30.0,
            default_position: (50.0, 50.0),
            renumber_every: Some(64),
            decode_policy: DecodePolicy::Coerce,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_item_size.is_finite() || self.min_item_size <= 0.0 {
            return Err(ConfigError::invalid("min_item_size", "must be a positive number"));
        }
        if !self.default_font_size.is_finite() || self.default_font_size <= 0.0 {
            return Err(ConfigError::invalid("default_font_size", "must be a positive number"));
        }
        for (field, size) in [
            ("default_shape_size", self.default_shape_size),
            ("default_image_size", self.default_image_size),
        ] {
            if !size.is_finite() || size < self.min_item_size || size > 100.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must lie within [{}, 100]", self.min_item_size),
                ));
            }
        }
        let (x, y) = self.default_position;
        if !(0.0..=100.0).contains(&x) || !(0.0..=100.0).contains(&y) {
            return Err(ConfigError::invalid("default_position", "must lie within [0, 100]"));
        }
        if self.renumber_every == Some(0) {
            return Err(ConfigError::invalid("renumber_every", "use null to disable renumbering"));
        }
        Ok(())
    }

    pub fn text_item(&self, value: impl Into<String>) -> TextItem {
        TextItem {
            value: value.into(),
            font_size: self.default_font_size,
            font_family: self.default_font_family.clone(),
            color: self.default_text_color.clone(),
        }
    }

    pub fn shape_item(&self, shape: ShapeKind) -> ShapeItem {
        ShapeItem {
            shape,
            color: self.default_shape_color.clone(),
            width: self.default_shape_size,
            height: self.default_shape_size,
        }
    }

    /// Image layer at the default width, keeping the bitmap's aspect ratio.
    pub fn image_item(
        &self,
        url: impl Into<String>,
        pixel_width: u32,
        pixel_height: u32,
    ) -> ImageItem {
        let width = self.default_image_size;
        let height = if pixel_width == 0 || pixel_height == 0 {
            width
        } else {
            width * f64::from(pixel_height) / f64::from(pixel_width)
        };
        ImageItem {
            url: url.into(),
            width,
            height: height.clamp(self.min_item_size, 100.0),
        }
    }
}
