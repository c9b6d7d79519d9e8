/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Canonical outlines for the sticker shapes, in a unit box (`0..=1` on both axes, y down).
//!
//! Backends scale the outline to the layer's box, so a shape stretches with independent
//! width and height.


use crate::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVerb {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
}

use PathVerb::{Close, CubicTo, LineTo, MoveTo};

// Quarter arcs with the usual 0.5523 control distance, radius 0.5.
const CIRCLE: &[PathVerb] = &[
    MoveTo(1.0, 0.5),
    CubicTo(1.0, 0.776_14, 0.776_14, 1.0, 0.5, 1.0),
    CubicTo(0.223_86, 1.0, 0.0, 0.776_14, 0.0, 0.5),
    CubicTo(0.0, 0.223_86, 0.223_86, 0.0, 0.5, 0.0),
    CubicTo(0.776_14, 0.0, 1.0, 0.223_86, 1.0, 0.5),
    Close,
];

const SQUARE: &[PathVerb] = &[
    MoveTo(0.0, 0.0),
    LineTo(1.0, 0.0),
    LineTo(1.0, 1.0),
    LineTo(0.0, 1.0),
    Close,
];

const TRIANGLE: &[PathVerb] = &[MoveTo(0.5, 0.0), LineTo(1.0, 1.0), LineTo(0.0, 1.0), Close];

// Five points, inner radius 0.382 of the outer, first point straight up.
const STAR: &[PathVerb] = &[
    MoveTo(0.5, 0.0),
    LineTo(0.612_257, 0.345_492),
    LineTo(0.975_528, 0.345_492),
    LineTo(0.681_636, 0.559_017),
    LineTo(0.793_893, 0.904_508),
    LineTo(0.5, 0.690_983),
    LineTo(0.206_107, 0.904_508),
    LineTo(0.318_364, 0.559_017),
    LineTo(0.024_472, 0.345_492),
    LineTo(0.387_743, 0.345_492),
    Close,
];

const HEART: &[PathVerb] = &[
    MoveTo(0.5, 0.22),
    CubicTo(0.5, 0.08, 0.38, 0.0, 0.25, 0.0),
    CubicTo(0.1, 0.0, 0.0, 0.12, 0.0, 0.28),
    CubicTo(0.0, 0.55, 0.3, 0.75, 0.5, 1.0),
    CubicTo(0.7, 0.75, 1.0, 0.55, 1.0, 0.28),
    CubicTo(1.0, 0.12, 0.9, 0.0, 0.75, 0.0),
    CubicTo(0.62, 0.0, 0.5, 0.08, 0.5, 0.22),
    Close,
];

impl ShapeKind {
    pub fn outline(self) -> &'static [PathVerb] {
        match self {
            ShapeKind::Circle => CIRCLE,
            ShapeKind::Square => SQUARE,
            ShapeKind::Triangle => TRIANGLE,
            ShapeKind::Star => STAR,
            ShapeKind::Heart => HEART,
        }
    }
}

/// SVG path data for an outline scaled to `width` x `height`.
pub fn svg_path_data(outline: &[PathVerb], width: f32, height: f32) -> String {
    outline
        .iter()
        .map(|verb| match *verb {
            MoveTo(x, y) => format!("M{} {}", x * width, y * height),
            LineTo(x, y) => format!("L{} {}", x * width, y * height),
            CubicTo(x1, y1, x2, y2, x, y) => format!(
                "C{} {} {} {} {} {}",
                x1 * width,
                y1 * height,
                x2 * width,
                y2 * height,
                x * width,
                y * height
            ),
            Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
