/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Read-only RSX redisplay of a saved customization, for cart and order views.
//!
//! Everything is laid out in percentages of the container, so the composition matches the
//! editor at any size with the same aspect ratio.

use decal_core::geometry::svg_path_data;
use decal_core::{
    codec, paint_list, CodecError, Document, EngineConfig, GlyphRun, PaintEntry, Visual,
};
use dioxus::prelude::*;

pub fn container_style(base_image: &str, aspect_ratio: f64) -> String {
    let background_style = if base_image.starts_with('#') {
        format!("background-color: {}", base_image)
    } else if ["http", "/", "blob:"].iter().any(|prefix| base_image.starts_with(prefix)) {
        format!(
            "background-image: url('{}'); background-size: 100% 100%; background-position: center",
            base_image
        )
    } else {
        format!("background: {}", base_image)
    };

    format!(
        "position: relative; width: 100%; aspect-ratio: {}; {}; overflow: hidden;",
        aspect_ratio, background_style
    )
}

/// Absolute placement of an entry, centered on its anchor.
pub fn entry_style(entry: &PaintEntry) -> String {
    let (x, y) = entry.center;
    let (w_css, h_css) = match entry.size {
        Some((w, h)) => (format!("{}%", w), format!("{}%", h)),
        None => ("max-content".to_string(), "max-content".to_string()),
    };
    format!(
        "position: absolute; left: {}%; top: {}%; width: {}; height: {}; \
         transform: translate(-50%, -50%);",
        x, y, w_css, h_css
    )
}

pub fn text_style(run: &GlyphRun) -> String {
    format!(
        "font-size: {}px; color: {}; font-family: {}; white-space: pre; line-height: 1.2;",
        run.font_size, run.color, run.font_family
    )
}

/// Inner content of one entry. Edit-mode text is shown as static text here.
pub fn visual_to_rsx(visual: &Visual) -> Element {
    match visual {
        Visual::Text(run) | Visual::TextInput(run) => {
            let style = text_style(run);
            rsx! {
                div { style: "{style}", "{run.text}" }
            }
        }
        Visual::Shape { color, outline, .. } => {
            let d = svg_path_data(outline, 100.0, 100.0);
            rsx! {
                svg {
                    view_box: "0 0 100 100",
                    preserve_aspect_ratio: "none",
                    width: "100%",
                    height: "100%",
                    path { d: "{d}", fill: "{color}" }
                }
            }
        }
        Visual::Image { url } => rsx! {
            img {
                src: "{url}",
                style: "display: block; width: 100%; height: 100%; object-fit: fill;",
                alt: "",
                draggable: "false",
            }
        },
    }
}

pub fn render_paint_list(entries: &[PaintEntry], base_image: &str, aspect_ratio: f64) -> Element {
    let container = container_style(base_image, aspect_ratio);

    rsx! {
        div {
            class: "decal-container",
            style: "{container}",
            for entry in entries.iter() {
                {
                    let style = entry_style(entry);
                    rsx! {
                        div {
                            key: "{entry.id}",
                            class: "decal-layer",
                            style: "{style}",
                            {visual_to_rsx(&entry.visual)}
                        }
                    }
                }
            }
        }
    }
}

/// Decodes `document` under `config` (decode policy, minimum item size) and lays it out.
pub fn render_to_rsx(
    document: &Document,
    base_image: &str,
    aspect_ratio: f64,
    config: &EngineConfig,
) -> Result<Element, CodecError> {
    let customization = codec::decode(document, config)?;
    Ok(render_paint_list(&paint_list(&customization), base_image, aspect_ratio))
}

#[component]
pub fn CustomizationView(
    document: Document,
    base_image: String,
    aspect_ratio: f64,
    #[props(default)] config: EngineConfig,
) -> Element {
    match render_to_rsx(&document, &base_image, aspect_ratio, &config) {
        Ok(element) => element,
        Err(err) => rsx! {
            div { class: "decal-container decal-error", "Customization unavailable: {err}" }
        },
    }
}
