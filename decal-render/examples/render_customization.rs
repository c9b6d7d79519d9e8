use decal_core::Document;
use decal_render::{Canvas, Renderer};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SAVED: &str = r##"{
    "texts": [
        { "value": "Team Decal", "fontSize": 28, "fontFamily": "Arial", "color": "#ffffff",
          "relativeX": 50, "relativeY": 30, "zIndex": 3 }
    ],
    "elements": [
        { "shape": "star", "color": "#f59e0b", "width": 18, "height": 18,
          "relativeX": 30, "relativeY": 62, "zIndex": 2 },
        { "shape": "heart", "color": "#ef4444", "width": 18, "height": 18,
          "relativeX": 70, "relativeY": 62, "zIndex": 4 }
    ],
    "images": [
        { "url": "blob:local/1", "width": 30, "height": 30,
          "relativeX": 50, "relativeY": 62, "zIndex": 1 }
    ]
}"##;

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("decal_render=debug")),
        )
        .init();

    let mut logo = RgbaImage::new(100, 100);
    for x in 0..100 {
        for y in 0..100 {
            let color = if (x / 10 + y / 10) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([30, 64, 175, 255])
            };
            logo.put_pixel(x, y, color);
        }
    }
    let mut logo_bytes = Vec::new();
    logo.write_to(&mut std::io::Cursor::new(&mut logo_bytes), image::ImageFormat::Png)
        .unwrap();

    let mut resources = HashMap::new();
    resources.insert("blob:local/1".to_string(), logo_bytes);

    let document = Document::from_json_str(SAVED).expect("saved customization");
    let canvas = Canvas {
        width: 480,
        height: 560,
        background: "#1f2937".to_string(),
    };

    let mut renderer = Renderer::new();
    let png = renderer.render(&document, &canvas, &resources).expect("Render failed");

    let mut file = File::create("customization.png").unwrap();
    file.write_all(&png).unwrap();
    println!("Wrote customization.png ({} bytes)", png.len());
}
