#![allow(non_snake_case)]

//! Interactive editing on top of `decal-core`: gesture sessions, text editing, uploads and the
//! cart hand-off, plus the Dioxus canvas that drives them.

pub mod cart;
pub mod component;
pub mod drag;
pub mod editor;
pub mod error;
pub mod resize;
pub mod session;
pub mod text_edit;
pub mod upload;

pub use cart::{CartCollaborator, CartLine, LineSelection, ProductContext};
pub use component::CustomizerCanvas;
pub use drag::DragSession;
pub use editor::CustomizationEditor;
pub use error::{EditorError, TransientIoError, UploadError, ValidationError};
pub use resize::ResizeSession;
pub use session::{InteractionSession, Pointer};
pub use text_edit::TextEditingController;
pub use upload::{ImageUploader, LocalBlobUploader, RawImage, UploadedImage};
