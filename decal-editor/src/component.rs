use decal_core::{PaintEntry, SelectionOverlay, Visual};
use decal_dioxus::{container_style, entry_style, text_style, visual_to_rsx};
use dioxus::prelude::*;

use crate::editor::CustomizationEditor;
use crate::session::Pointer;

const EDITOR_CSS: &str = "
.decal-editor { user-select: none; outline: none; }
.decal-layer { cursor: grab; }
.decal-layer.selected { outline: 1px dashed #3b82f6; }
.decal-text-input { border: none; background: transparent; padding: 0; margin: 0; outline: none; }
.decal-selection { position: absolute; transform: translate(-50%, -50%); pointer-events: none; }
.decal-selection > * { pointer-events: auto; }
.decal-delete {
    position: absolute; top: -14px; right: -14px;
    width: 22px; height: 22px; border-radius: 50%;
}
.decal-resize-handle {
    position: absolute; right: -6px; bottom: -6px;
    width: 12px; height: 12px; background: #3b82f6; cursor: nwse-resize;
}
.decal-layer-menu {
    position: absolute; top: 100%; left: 0; margin-top: 8px; display: flex; gap: 4px;
}
";

fn pointer(evt: &MouseEvent) -> Pointer {
    let coords = evt.page_coordinates();
    Pointer::new(coords.x, coords.y)
}

/// Interactive canvas over the product image. `width`/`height` are the container's pixel size,
/// snapshotted by the editor at the start of every gesture.
#[component]
pub fn CustomizerCanvas(
    mut editor: Signal<CustomizationEditor>,
    base_image: String,
    width: f64,
    height: f64,
) -> Element {
    let frame = editor.read().frame();
    let overlay = frame.overlay.clone();
    let buffer = editor.read().edit_buffer().map(str::to_string);
    let selected = editor.read().selected();
    let container = container_style(&base_image, width / height);
    let cursor = if editor.read().session().is_idle() { "default" } else { "grabbing" };

    rsx! {
        style { {EDITOR_CSS} }
        div {
            class: "decal-container decal-editor",
            style: "{container} width: {width}px; cursor: {cursor};",
            tabindex: "0",
            onkeydown: move |evt| {
                if evt.key() == Key::Delete && editor.read().editing_id().is_none() {
                    editor.write().delete_selected();
                }
            },
            onmousemove: move |evt| {
                editor.write().pointer_move(pointer(&evt));
            },
            onmouseup: move |_| {
                editor.write().pointer_up();
            },
            onmouseleave: move |_| {
                editor.write().pointer_leave();
            },
            onclick: move |_| {
                editor.write().click_empty_canvas();
            },

            for entry in frame.paint.iter() {
                CanvasLayer {
                    key: "{entry.id}",
                    editor,
                    entry: entry.clone(),
                    buffer: buffer.clone(),
                    selected: selected == Some(entry.id),
                    width,
                    height,
                }
            }

            if let Some(overlay) = overlay {
                SelectionControls { editor, overlay, width, height }
            }
        }
    }
}

#[component]
fn CanvasLayer(
    mut editor: Signal<CustomizationEditor>,
    entry: PaintEntry,
    buffer: Option<String>,
    selected: bool,
    width: f64,
    height: f64,
) -> Element {
    let id = entry.id;
    let style = entry_style(&entry);
    let class_name = if selected { "decal-layer selected" } else { "decal-layer" };

    rsx! {
        div {
            class: "{class_name}",
            style: "{style}",
            onmousedown: move |evt| {
                evt.stop_propagation();
                editor.write().pointer_down_item(id, pointer(&evt), (width, height));
            },
            onclick: move |evt| {
                evt.stop_propagation();
                editor.write().select(id);
            },
            ondoubleclick: move |evt| {
                evt.stop_propagation();
                editor.write().double_click(id);
            },
            ondragstart: move |evt| evt.prevent_default(),

            match &entry.visual {
                Visual::TextInput(run) => {
                    let input_style = text_style(run);
                    let value = buffer.clone().unwrap_or_else(|| run.text.clone());
                    rsx! {
                        input {
                            class: "decal-text-input",
                            style: "{input_style}",
                            value: "{value}",
                            autofocus: true,
                            oninput: move |evt| {
                                editor.write().edit_input(evt.value());
                            },
                            onblur: move |_| {
                                editor.write().blur(id);
                            },
                        }
                    }
                }
                visual => visual_to_rsx(visual),
            }
        }
    }
}

#[component]
fn SelectionControls(
    mut editor: Signal<CustomizationEditor>,
    overlay: SelectionOverlay,
    width: f64,
    height: f64,
) -> Element {
    let id = overlay.id;
    let (x, y) = overlay.center;
    let (w_css, h_css) = match overlay.size {
        Some((w, h)) => (format!("{}%", w), format!("{}%", h)),
        None => ("0".to_string(), "0".to_string()),
    };
    let menu = overlay.layer_menu;

    rsx! {
        div {
            class: "decal-selection",
            style: "left: {x}%; top: {y}%; width: {w_css}; height: {h_css};",

            if overlay.delete_control {
                button {
                    class: "decal-delete",
                    title: "Delete",
                    onmousedown: move |evt| evt.stop_propagation(),
                    onclick: move |evt| {
                        evt.stop_propagation();
                        editor.write().delete(id);
                    },
                    "×"
                }
            }

            if overlay.resize_handle {
                div {
                    class: "decal-resize-handle",
                    onmousedown: move |evt| {
                        evt.stop_propagation();
                        editor
                            .write()
                            .pointer_down_resize_handle(id, pointer(&evt), (width, height));
                    },
                    onclick: move |evt| evt.stop_propagation(),
                }
            }

            if menu.show_layer_option {
                div {
                    class: "decal-layer-menu",
                    onmousedown: move |evt| evt.stop_propagation(),
                    onclick: move |evt| evt.stop_propagation(),
                    button {
                        disabled: !menu.can_bring_to_front,
                        onclick: move |_| {
                            editor.write().bring_to_front(id);
                        },
                        "Front"
                    }
                    button {
                        disabled: !menu.can_bring_forward,
                        onclick: move |_| {
                            editor.write().bring_forward(id);
                        },
                        "Forward"
                    }
                    button {
                        disabled: !menu.can_send_backward,
                        onclick: move |_| {
                            editor.write().send_backward(id);
                        },
                        "Backward"
                    }
                    button {
                        disabled: !menu.can_send_to_back,
                        onclick: move |_| {
                            editor.write().send_to_back(id);
                        },
                        "Back"
                    }
                }
            }
        }
    }
}
