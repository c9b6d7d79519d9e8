use decal_core::{EngineConfig, ShapeKind};
use decal_editor::{CustomizationEditor, CustomizerCanvas};
use dioxus::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const BASE_IMAGE: &str = "#e5e7eb";

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("decal_editor=debug")),
        )
        .init();

    dioxus::launch(App);
}

fn App() -> Element {
    let mut editor = use_signal(|| CustomizationEditor::new(EngineConfig::default()));
    let mut exported = use_signal(String::new);

    rsx! {
        style {
            "{{
                body, html {{
                    margin: 0;
                    padding: 0;
                    font-family: sans-serif;
                }}
                .toolbar {{ display: flex; gap: 8px; padding: 12px; }}
                .stage {{ padding: 12px; }}
            }}"
        }
        div { class: "toolbar",
            button {
                onclick: move |_| {
                    editor.write().add_text(None);
                },
                "Add text"
            }
            for kind in ShapeKind::ALL {
                button {
                    key: "{kind}",
                    onclick: move |_| {
                        editor.write().add_shape(kind);
                    },
                    "Add {kind}"
                }
            }
            button {
                onclick: move |_| {
                    let json = editor.read().document().to_json_string().unwrap_or_default();
                    exported.set(json);
                },
                "Export"
            }
        }
        div { class: "stage",
            CustomizerCanvas {
                editor,
                base_image: BASE_IMAGE.to_string(),
                width: 480.0,
                height: 560.0,
            }
        }
        pre { "{exported}" }
    }
}
