/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

//! Raster redisplay of a saved customization, for order thumbnails and print previews.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashImage};
use decal_core::geometry::PathVerb;
use decal_core::{
    codec, paint_list, CodecError, ContainerSnapshot, Document, EngineConfig, GlyphRun, PaintEntry,
    Visual,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tiny_skia::*;
use tracing::{debug, trace, warn};

mod color;

use color::parse_color;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create pixmap: {0}")]
    PixmapCreationError(String),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Image decoding error: {0}")]
    ImageError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Output surface. `background` is either a CSS color or the resource key of the
/// product image, which is stretched to the full canvas like the interactive container.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

pub struct Renderer {
    config: EngineConfig,
    font_system: FontSystem,
    swash_cache: SwashCache,
    pixmap_buffer: Option<Pixmap>,
    image_cache: HashMap<String, Pixmap>,
    loaded_fonts: HashSet<String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

enum FamilyChoice {
    Generic(Family<'static>),
    Named(String),
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Uses `config` to decode documents, so the same coercion rules apply as in the editor.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            pixmap_buffer: None,
            image_cache: HashMap::new(),
            loaded_fonts: HashSet::new(),
        }
    }

    fn load_fonts(&mut self, resources: &HashMap<String, Vec<u8>>) {
        let mut new_fonts = false;
        for (name, data) in resources {
            let is_font = [".ttf", ".otf", ".woff2"].iter().any(|ext| name.ends_with(ext));
            if is_font && !self.loaded_fonts.contains(name) {
                self.font_system.db_mut().load_font_data(data.clone());
                self.loaded_fonts.insert(name.clone());
                new_fonts = true;
            }
        }
        if !new_fonts {
            return;
        }

        let first_family = self
            .font_system
            .db()
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()));

        if let Some(family) = first_family {
            debug!(%family, faces = self.font_system.db().len(), "Default font family set");
            let db = self.font_system.db_mut();
            db.set_sans_serif_family(family.clone());
            db.set_serif_family(family.clone());
            db.set_monospace_family(family.clone());
            db.set_cursive_family(family.clone());
            db.set_fantasy_family(family);
        }
    }

    /// Renders `document` into the internal buffer and returns the premultiplied RGBA8 pixels.
    /// The buffer is reused between calls with the same canvas size.
    pub fn render_raw(
        &mut self,
        document: &Document,
        canvas: &Canvas,
        resources: &HashMap<String, Vec<u8>>,
    ) -> Result<&[u8], RenderError> {
        let customization = codec::decode(document, &self.config)?;
        let container = ContainerSnapshot::new(canvas.width as f64, canvas.height as f64)
            .ok_or_else(|| {
                RenderError::InvalidDimensions(format!("{}x{}", canvas.width, canvas.height))
            })?;

        self.load_fonts(resources);

        if self
            .pixmap_buffer
            .as_ref()
            .is_none_or(|p| p.width() != canvas.width || p.height() != canvas.height)
        {
            self.pixmap_buffer = Pixmap::new(canvas.width, canvas.height);
        }

        let Self {
            font_system,
            swash_cache,
            pixmap_buffer,
            image_cache,
            ..
        } = self;
        let pixmap = pixmap_buffer
            .as_mut()
            .ok_or_else(|| RenderError::PixmapCreationError("Invalid canvas dimensions".into()))?;

        paint_background(pixmap, canvas, resources, image_cache)?;

        let entries = paint_list(&customization);
        debug!(
            layers = entries.len(),
            width = canvas.width,
            height = canvas.height,
            "Rendering customization"
        );

        for entry in &entries {
            match &entry.visual {
                Visual::Shape { color, outline, .. } => {
                    paint_shape(pixmap, entry, color, outline, container)?;
                }
                Visual::Image { url } => {
                    paint_image(pixmap, entry, url, container, resources, image_cache);
                }
                Visual::Text(run) | Visual::TextInput(run) => {
                    paint_text(pixmap, font_system, swash_cache, entry, run, container)?;
                }
            }
        }

        Ok(pixmap.data())
    }

    pub fn render(
        &mut self,
        document: &Document,
        canvas: &Canvas,
        resources: &HashMap<String, Vec<u8>>,
    ) -> Result<Vec<u8>, RenderError> {
        self.render_raw(document, canvas, resources)?;

        self.pixmap_buffer
            .as_ref()
            .ok_or_else(|| RenderError::PixmapCreationError("No pixmap rendered".into()))?
            .encode_png()
            .map_err(|e| RenderError::EncodingError(e.to_string()))
    }
}

/// Box of a sized entry in canvas pixels: `(x, y, width, height)` of the top-left corner.
fn pixel_box(entry: &PaintEntry, container: ContainerSnapshot) -> Option<(f32, f32, f32, f32)> {
    let (ox, oy) = entry.origin()?;
    let (w, h) = entry.size?;
    let (x, y) = container.to_absolute(ox, oy);
    let (w, h) = container.to_absolute(w, h);
    Some((x as f32, y as f32, w as f32, h as f32))
}

fn paint_background(
    pixmap: &mut Pixmap,
    canvas: &Canvas,
    resources: &HashMap<String, Vec<u8>>,
    image_cache: &mut HashMap<String, Pixmap>,
) -> Result<(), RenderError> {
    if let Some(color) = parse_color(&canvas.background) {
        pixmap.fill(color);
        return Ok(());
    }

    let Some(bytes) = resources.get(&canvas.background) else {
        warn!(background = %canvas.background, "Background not found, using white");
        pixmap.fill(Color::WHITE);
        return Ok(());
    };

    let cache_key = format!("bg_{}_{}_{}", canvas.background, canvas.width, canvas.height);
    if !image_cache.contains_key(&cache_key) {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| RenderError::ImageError(format!("{}: {}", canvas.background, e)))?;
        let stretched = decode_to_pixmap(&decoded, canvas.width, canvas.height)?;
        image_cache.insert(cache_key.clone(), stretched);
    }

    if let Some(bg) = image_cache.get(&cache_key) {
        pixmap.draw_pixmap(0, 0, bg.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }
    Ok(())
}

fn paint_shape(
    pixmap: &mut Pixmap,
    entry: &PaintEntry,
    color: &str,
    outline: &[PathVerb],
    container: ContainerSnapshot,
) -> Result<(), RenderError> {
    let Some(color) = parse_color(color) else {
        warn!(id = %entry.id, %color, "Unrecognized shape color, skipping layer");
        return Ok(());
    };
    let Some((x, y, w, h)) = pixel_box(entry, container) else {
        return Ok(());
    };

    let mut pb = PathBuilder::new();
    for verb in outline {
        match *verb {
            PathVerb::MoveTo(px, py) => pb.move_to(px, py),
            PathVerb::LineTo(px, py) => pb.line_to(px, py),
            PathVerb::CubicTo(x1, y1, x2, y2, px, py) => pb.cubic_to(x1, y1, x2, y2, px, py),
            PathVerb::Close => pb.close(),
        }
    }
    let Some(path) = pb.finish() else {
        return Ok(());
    };

    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;

    // Outline is a unit box; scale it onto the layer's box.
    let transform = Transform::from_row(w, 0.0, 0.0, h, x, y);
    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    trace!(id = %entry.id, x, y, w, h, "Painted shape");
    Ok(())
}

/// Stretches the cached natural-size bitmap over the layer box, filling only the part inside the
/// canvas.
fn paint_image(
    pixmap: &mut Pixmap,
    entry: &PaintEntry,
    url: &str,
    container: ContainerSnapshot,
    resources: &HashMap<String, Vec<u8>>,
    image_cache: &mut HashMap<String, Pixmap>,
) {
    let Some((x, y, w, h)) = pixel_box(entry, container) else {
        return;
    };
    let canvas_w = container.width() as f32;
    let canvas_h = container.height() as f32;
    let visible =
        Rect::from_ltrb(x.max(0.0), y.max(0.0), (x + w).min(canvas_w), (y + h).min(canvas_h));
    let Some(visible) = visible else {
        trace!(id = %entry.id, "Image outside the canvas");
        return;
    };

    if !image_cache.contains_key(url) {
        let Some(bytes) = resources.get(url) else {
            warn!(id = %entry.id, %url, "Image resource not found, skipping layer");
            return;
        };
        let decoded = match image::load_from_memory(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(id = %entry.id, %url, error = %e, "Failed to decode image, skipping layer");
                return;
            }
        };
        match image_to_pixmap(&decoded) {
            Ok(natural) => {
                image_cache.insert(url.to_string(), natural);
            }
            Err(e) => {
                warn!(id = %entry.id, %url, error = %e, "Failed to load image, skipping layer");
                return;
            }
        }
    }
    let Some(image_pixmap) = image_cache.get(url) else {
        return;
    };

    let scale_x = w / image_pixmap.width() as f32;
    let scale_y = h / image_pixmap.height() as f32;
    let pattern = Pattern::new(
        image_pixmap.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bilinear,
        1.0,
        Transform::from_row(scale_x, 0.0, 0.0, scale_y, x, y),
    );

    let mut paint = Paint::default();
    paint.shader = pattern;
    paint.anti_alias = true;
    pixmap.fill_rect(visible, &paint, Transform::identity(), None);
    trace!(id = %entry.id, x, y, w, h, "Painted image");
}

fn paint_text(
    pixmap: &mut Pixmap,
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    entry: &PaintEntry,
    run: &GlyphRun,
    container: ContainerSnapshot,
) -> Result<(), RenderError> {
    let Some(text_color) = parse_color(&run.color) else {
        warn!(id = %entry.id, color = %run.color, "Unrecognized text color, skipping layer");
        return Ok(());
    };

    let font_size = run.font_size as f32;
    let line_height = font_size * 1.2;
    let mut buffer = Buffer::new(font_system, Metrics::new(font_size, line_height));

    let choice = resolve_family(font_system, &run.font_family);
    let family = match &choice {
        FamilyChoice::Generic(family) => *family,
        FamilyChoice::Named(name) => Family::Name(name),
    };
    let attrs = Attrs::new().family(family);

    buffer.set_text(font_system, &run.text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);

    // Text has no box of its own; center the laid-out block on the anchor.
    let (line_count, block_width) = buffer
        .layout_runs()
        .fold((0usize, 0.0f32), |(n, w), line| (n + 1, w.max(line.line_w)));
    let block_height = line_count as f32 * line_height;
    let (cx, cy) = container.to_absolute(entry.center.0, entry.center.1);
    let left = cx as f32 - block_width / 2.0;
    let top = cy as f32 - block_height / 2.0;
    let origin = Transform::from_translate(left, top);

    let mut glyphs_drawn = 0usize;
    for line in buffer.layout_runs() {
        for glyph in line.glyphs {
            let physical_glyph = glyph.physical((0., 0.), 1.0);
            let Some(image) = swash_cache.get_image(font_system, physical_glyph.cache_key) else {
                continue;
            };
            let Some(glyph_pixmap) = glyph_to_pixmap(image, text_color) else {
                continue;
            };

            let glyph_x = physical_glyph.x as f32 + image.placement.left as f32;
            let glyph_y = line.line_y + physical_glyph.y as f32 - image.placement.top as f32;
            pixmap.draw_pixmap(
                0,
                0,
                glyph_pixmap.as_ref(),
                &PixmapPaint::default(),
                origin.pre_translate(glyph_x, glyph_y),
                None,
            );
            glyphs_drawn += 1;
        }
    }

    trace!(id = %entry.id, glyphs_drawn, "Painted text");
    Ok(())
}

fn resolve_family(font_system: &FontSystem, css_family: &str) -> FamilyChoice {
    for f in css_family.split(',').map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'')) {
        match f.to_lowercase().as_str() {
            "arial" | "sans-serif" | "sans serif" | "system-ui" | "-apple-system" => {
                return FamilyChoice::Generic(Family::SansSerif);
            }
            "serif" => return FamilyChoice::Generic(Family::Serif),
            "mono" | "monospace" => return FamilyChoice::Generic(Family::Monospace),
            _ => {
                let normalized_query = f.to_lowercase().replace(' ', "");
                let found = font_system.db().faces().find_map(|face| {
                    face.families
                        .iter()
                        .find(|(name, _)| name.to_lowercase().replace(' ', "") == normalized_query)
                        .map(|(name, _)| name.clone())
                });
                if let Some(name) = found {
                    trace!(requested = f, matched = %name, "Matched font");
                    return FamilyChoice::Named(name);
                }
            }
        }
    }
    debug!(font_family = css_family, "Using sans-serif fallback");
    FamilyChoice::Generic(Family::SansSerif)
}

/// Coverage masks are tinted with `color`; color glyphs (emoji) are used as-is.
fn glyph_to_pixmap(image: &SwashImage, color: Color) -> Option<Pixmap> {
    let width = image.placement.width;
    let height = image.placement.height;
    if width == 0 || height == 0 {
        return None;
    }
    let size = IntSize::from_wh(width, height)?;
    let area = (width * height) as usize;

    let pixels = if image.data.len() == area {
        let mut pixels = Vec::with_capacity(area * 4);
        for mask in &image.data {
            let alpha = color.alpha() * (*mask as f32 / 255.0);
            pixels.push((color.red() * alpha * 255.0) as u8);
            pixels.push((color.green() * alpha * 255.0) as u8);
            pixels.push((color.blue() * alpha * 255.0) as u8);
            pixels.push((alpha * 255.0) as u8);
        }
        pixels
    } else if image.data.len() == area * 4 {
        premultiply(&image.data)
    } else {
        warn!(len = image.data.len(), width, height, "Unknown glyph image format");
        return None;
    };

    Pixmap::from_vec(pixels, size)
}

fn decode_to_pixmap(
    decoded: &image::DynamicImage,
    width: u32,
    height: u32,
) -> Result<Pixmap, RenderError> {
    let resized = decoded.resize_exact(width, height, image::imageops::FilterType::Lanczos3);
    let rgba = resized.to_rgba8();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| RenderError::InvalidDimensions(format!("{}x{}", width, height)))?;
    Pixmap::from_vec(premultiply(rgba.as_raw()), size)
        .ok_or_else(|| RenderError::PixmapCreationError(format!("{}x{}", width, height)))
}

fn image_to_pixmap(decoded: &image::DynamicImage) -> Result<Pixmap, RenderError> {
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| RenderError::InvalidDimensions(format!("{}x{}", width, height)))?;
    Pixmap::from_vec(premultiply(rgba.as_raw()), size)
        .ok_or_else(|| RenderError::PixmapCreationError(format!("{}x{}", width, height)))
}

fn premultiply(rgba: &[u8]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(rgba.len());
    for chunk in rgba.chunks_exact(4) {
        let a_f = chunk[3] as f32 / 255.0;
        pixels.push((chunk[0] as f32 * a_f) as u8);
        pixels.push((chunk[1] as f32 * a_f) as u8);
        pixels.push((chunk[2] as f32 * a_f) as u8);
        pixels.push(chunk[3]);
    }
    pixels
}
