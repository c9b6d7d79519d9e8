/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Conversion between container pixels and percentage space.
//!
//! The transforms never clamp. Clamping happens only when a value is committed to the
//! layer model, see [`clamp_percent`] and [`clamp_size`].

/// Converts a container-relative pixel position (or delta) into percentages.
pub fn to_relative(px: f64, py: f64, container_w: f64, container_h: f64) -> (f64, f64) {
    (px * 100.0 / container_w, py * 100.0 / container_h)
}

/// Converts percentages back into container pixels.
pub fn to_absolute(rel_x: f64, rel_y: f64, container_w: f64, container_h: f64) -> (f64, f64) {
    (rel_x * container_w / 100.0, rel_y * container_h / 100.0)
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

pub fn clamp_size(value: f64, min: f64) -> f64 {
    value.max(min)
}

/// Container dimensions captured once when an interaction session starts.
///
/// Every delta of the session is computed against this snapshot, so resizing the container
/// mid-gesture cannot make the item jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSnapshot {
    width: f64,
    height: f64,
}

impl ContainerSnapshot {
    /// Returns `None` for empty or non-finite containers, which have no percentage space.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn to_relative(&self, px: f64, py: f64) -> (f64, f64) {
        to_relative(px, py, self.width, self.height)
    }

    pub fn to_absolute(&self, rel_x: f64, rel_y: f64) -> (f64, f64) {
        to_absolute(rel_x, rel_y, self.width, self.height)
    }
}
