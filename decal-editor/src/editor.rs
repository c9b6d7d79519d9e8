use decal_core::{
    codec, paint, CodecError, ContainerSnapshot, Customization, Document, EngineConfig, Frame, Item,
    ItemId, RenderMode, ShapeKind, TextStyle, ViewState, ZOrderState,
};
use tracing::{debug, info};

use crate::cart::{CartCollaborator, CartLine, LineSelection, ProductContext};
use crate::drag::DragSession;
use crate::error::{EditorError, UploadError, ValidationError};
use crate::resize::ResizeSession;
use crate::session::{InteractionSession, Pointer};
use crate::text_edit::TextEditingController;
use crate::upload::{ImageUploader, RawImage, UploadedImage};

/// Transient editing state around one [`Customization`].
///
/// All input goes through here. Nothing but the customization itself is ever exported.
#[derive(Debug, Clone)]
pub struct CustomizationEditor {
    config: EngineConfig,
    model: Customization,
    session: InteractionSession,
    text_edit: TextEditingController,
    selected: Option<ItemId>,
    read_only: bool,
    reorders: u32,
    /// Set when pointer-up ends a gesture; the click the browser fires next is not a deselect.
    release_click: bool,
}

impl Default for CustomizationEditor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CustomizationEditor {
    pub fn new(config: EngineConfig) -> Self {
        let model = Customization::with_min_item_size(config.min_item_size);
        Self::from_parts(config, model, false)
    }

    /// Resumes editing a previously saved document.
    pub fn with_document(document: &Document, config: EngineConfig) -> Result<Self, CodecError> {
        let model = codec::decode(document, &config)?;
        Ok(Self::from_parts(config, model, false))
    }

    /// Redisplay only: every pointer and edit handler is a no-op and no overlay is drawn.
    pub fn read_only(document: &Document, config: EngineConfig) -> Result<Self, CodecError> {
        let model = codec::decode(document, &config)?;
        Ok(Self::from_parts(config, model, true))
    }

    fn from_parts(config: EngineConfig, model: Customization, read_only: bool) -> Self {
        Self {
            config,
            model,
            session: InteractionSession::Idle,
            text_edit: TextEditingController::default(),
            selected: None,
            read_only,
            reorders: 0,
            release_click: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn customization(&self) -> &Customization {
        &self.model
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn editing_id(&self) -> Option<ItemId> {
        self.text_edit.editing_id()
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.text_edit.buffer()
    }

    // Adding

    fn add(&mut self, item: Item) -> Option<ItemId> {
        if self.read_only {
            return None;
        }
        let (x, y) = self.config.default_position;
        let id = self.model.insert(item, x, y);
        self.select(id);
        Some(id)
    }

    pub fn add_text(&mut self, value: Option<&str>) -> Option<ItemId> {
        let value = value.unwrap_or(self.config.default_text_value.as_str()).to_string();
        let item = Item::Text(self.config.text_item(value));
        self.add(item)
    }

    pub fn add_shape(&mut self, shape: ShapeKind) -> Option<ItemId> {
        let item = Item::Shape(self.config.shape_item(shape));
        self.add(item)
    }

    pub fn add_image(&mut self, image: &UploadedImage) -> Option<ItemId> {
        let item = self.config.image_item(image.url.clone(), image.width, image.height);
        self.add(Item::Image(item))
    }

    /// Uploads and places an image in one step.
    pub fn upload_image<U: ImageUploader>(
        &mut self,
        uploader: &mut U,
        file: &RawImage,
    ) -> Result<Option<ItemId>, UploadError> {
        if self.read_only {
            return Ok(None);
        }
        let uploaded = uploader.upload(file)?;
        Ok(self.add_image(&uploaded))
    }

    /// Removes a layer along with any selection, edit or gesture attached to it.
    pub fn delete(&mut self, id: ItemId) -> bool {
        if self.read_only || self.model.remove(id).is_none() {
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.session.item() == Some(id) {
            self.session = InteractionSession::Idle;
        }
        self.text_edit.forget(id);
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    // Selection

    /// Selects a layer. Selecting anything but the edited text commits that edit.
    pub fn select(&mut self, id: ItemId) -> bool {
        if self.read_only || !self.model.contains(id) {
            return false;
        }
        if self.text_edit.editing_id().is_some_and(|editing| editing != id) {
            self.text_edit.commit(&mut self.model);
        }
        self.release_click = false;
        self.selected = Some(id);
        true
    }

    /// Moves the selection for a gesture. Another layer's open edit keeps its buffer and
    /// commits on its own blur.
    fn select_for_gesture(&mut self, id: ItemId) {
        self.release_click = false;
        self.selected = Some(id);
    }

    /// Commits any open edit and clears the selection. The click that follows the release of a
    /// gesture is ignored, so a drag ending outside its item keeps the item selected.
    pub fn click_empty_canvas(&mut self) {
        if self.read_only || std::mem::take(&mut self.release_click) {
            return;
        }
        self.text_edit.commit(&mut self.model);
        self.selected = None;
    }

    // Pointer gestures

    fn can_start_session(&self, id: ItemId, pointer: Pointer) -> bool {
        !self.read_only && self.session.is_idle() && pointer.is_finite() && self.model.contains(id)
    }

    /// Pointer-down on a layer body starts a drag. Ignored while another gesture is active and
    /// on the layer currently in text edit mode.
    pub fn pointer_down_item(
        &mut self,
        id: ItemId,
        pointer: Pointer,
        container: (f64, f64),
    ) -> bool {
        if !self.can_start_session(id, pointer) || self.text_edit.editing_id() == Some(id) {
            return false;
        }
        let Some(snapshot) = ContainerSnapshot::new(container.0, container.1) else {
            return false;
        };
        self.select_for_gesture(id);
        match DragSession::begin(&self.model, id, pointer, snapshot) {
            Some(drag) => {
                debug!(%id, width = snapshot.width(), height = snapshot.height(), "Drag started");
                self.session = InteractionSession::Dragging(drag);
                true
            }
            None => false,
        }
    }

    /// Pointer-down on the resize handle. Never starts a drag as well.
    pub fn pointer_down_resize_handle(
        &mut self,
        id: ItemId,
        pointer: Pointer,
        container: (f64, f64),
    ) -> bool {
        if !self.can_start_session(id, pointer) {
            return false;
        }
        let Some(snapshot) = ContainerSnapshot::new(container.0, container.1) else {
            return false;
        };
        let Some(resize) = ResizeSession::begin(&self.model, id, pointer, snapshot) else {
            return false;
        };
        self.select_for_gesture(id);
        debug!(%id, "Resize started");
        self.session = InteractionSession::Resizing(resize);
        true
    }

    pub fn pointer_move(&mut self, pointer: Pointer) -> bool {
        if !pointer.is_finite() {
            return false;
        }
        match &self.session {
            InteractionSession::Idle => false,
            InteractionSession::Dragging(drag) => drag.update(&mut self.model, pointer),
            InteractionSession::Resizing(resize) => resize.update(&mut self.model, pointer),
        }
    }

    fn end_session(&mut self, reason: &'static str) -> Option<ItemId> {
        let item = self.session.item()?;
        self.session = InteractionSession::Idle;
        debug!(%item, reason, "Gesture committed");
        Some(item)
    }

    pub fn pointer_up(&mut self) -> Option<ItemId> {
        let ended = self.end_session("pointer up");
        self.release_click = ended.is_some();
        ended
    }

    /// Leaving the surface keeps the last previewed geometry rather than reverting it.
    pub fn pointer_leave(&mut self) -> Option<ItemId> {
        self.release_click = false;
        self.end_session("pointer left surface")
    }

    // Text editing

    /// Double-click on a text layer opens it for editing unless it is being dragged.
    pub fn double_click(&mut self, id: ItemId) -> bool {
        if self.read_only || self.session.is_dragging(id) {
            return false;
        }
        if self.model.get(id).and_then(|layer| layer.as_text()).is_none() {
            return false;
        }
        self.select(id);
        self.text_edit.begin(&mut self.model, id)
    }

    pub fn edit_input(&mut self, text: impl Into<String>) -> bool {
        !self.read_only && self.text_edit.input(text)
    }

    pub fn blur(&mut self, id: ItemId) -> bool {
        self.text_edit.blur(&mut self.model, id)
    }

    pub fn set_text_style(&mut self, id: ItemId, style: TextStyle) -> bool {
        !self.read_only && self.model.set_text_style(id, style)
    }

    pub fn set_color(&mut self, id: ItemId, color: impl Into<String>) -> bool {
        !self.read_only && self.model.set_color(id, color)
    }

    // Layer order

    fn reordered(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        if let Some(every) = self.config.renumber_every {
            self.reorders += 1;
            if self.reorders >= every {
                self.model.normalize_z_order();
                self.reorders = 0;
            }
        }
        true
    }

    pub fn bring_forward(&mut self, id: ItemId) -> bool {
        let changed = !self.read_only && self.model.bring_forward(id);
        self.reordered(changed)
    }

    pub fn send_backward(&mut self, id: ItemId) -> bool {
        let changed = !self.read_only && self.model.send_backward(id);
        self.reordered(changed)
    }

    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        let changed = !self.read_only && self.model.bring_to_front(id);
        self.reordered(changed)
    }

    pub fn send_to_back(&mut self, id: ItemId) -> bool {
        let changed = !self.read_only && self.model.send_to_back(id);
        self.reordered(changed)
    }

    pub fn z_order_state(&self, id: ItemId) -> ZOrderState {
        self.model.z_order_state(id)
    }

    // Output

    pub fn frame(&self) -> Frame {
        let editing = self.text_edit.editing_id().zip(self.text_edit.buffer());
        let view = ViewState {
            selected: self.selected,
            editing,
            mode: if self.read_only {
                RenderMode::ReadOnly
            } else {
                RenderMode::Interactive
            },
        };
        paint::render(&self.model, &view)
    }

    /// Persisted form of the committed layers. Open edit buffers are not included.
    pub fn document(&self) -> Document {
        codec::encode(&self.model)
    }

    /// Validates the shopper's choices and snapshots the document for the cart.
    ///
    /// An open text edit is committed first so typed text is not lost.
    pub fn prepare_cart_line(
        &mut self,
        product: &ProductContext,
        selection: &LineSelection,
    ) -> Result<CartLine, ValidationError> {
        let (size, color) = selection.validate(product)?;
        if !self.read_only {
            self.text_edit.commit(&mut self.model);
        }
        Ok(CartLine {
            product_id: product.product_id.clone(),
            quantity: selection.quantity,
            size,
            color,
            customization: self.document(),
        })
    }

    /// Submits the current composition. Editing stays possible while the collaborator works,
    /// and later edits do not alter the submitted line.
    pub fn add_to_cart<C: CartCollaborator>(
        &mut self,
        product: &ProductContext,
        selection: &LineSelection,
        cart: &mut C,
    ) -> Result<CartLine, EditorError> {
        let line = self.prepare_cart_line(product, selection)?;
        cart.add_line(&line)?;
        info!(
            product = %line.product_id,
            layers = self.model.len(),
            "Customization added to cart"
        );
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransientIoError;
    use crate::upload::{png_bytes, LocalBlobUploader};
    use decal_core::Visual;

    const CONTAINER: (f64, f64) = (400.0, 300.0);

    fn layer_xy(editor: &CustomizationEditor, id: ItemId) -> (f64, f64) {
        let layer = editor.customization().get(id).unwrap();
        (layer.relative_x, layer.relative_y)
    }

    #[test]
    fn added_items_use_config_defaults_and_get_selected() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(None).unwrap();
        let s = editor.add_shape(ShapeKind::Star).unwrap();

        let text = editor.customization().get(t).unwrap();
        assert_eq!(text.as_text().unwrap().font_size, 22.0);
        assert_eq!(text.as_text().unwrap().value, "Your text");
        assert_eq!(editor.customization().get(s).unwrap().size(), Some((48.0, 48.0)));
        assert_eq!(editor.selected(), Some(s));
        assert_eq!(layer_xy(&editor, s), (50.0, 50.0));
    }

    #[test]
    fn only_one_gesture_at_a_time() {
        let mut editor = CustomizationEditor::default();
        let a = editor.add_shape(ShapeKind::Circle).unwrap();
        let b = editor.add_shape(ShapeKind::Square).unwrap();

        assert!(editor.pointer_down_item(a, Pointer::new(0.0, 0.0), CONTAINER));
        assert!(!editor.pointer_down_item(b, Pointer::new(0.0, 0.0), CONTAINER));
        assert!(!editor.pointer_down_resize_handle(b, Pointer::new(0.0, 0.0), CONTAINER));

        editor.pointer_move(Pointer::new(40.0, 0.0));
        assert_eq!(layer_xy(&editor, a), (60.0, 50.0));
        assert_eq!(layer_xy(&editor, b), (50.0, 50.0));
        assert_eq!(editor.pointer_up(), Some(a));
        assert!(editor.session().is_idle());
        assert_eq!(editor.pointer_up(), None);
    }

    #[test]
    fn session_keeps_its_container_snapshot() {
        let mut editor = CustomizationEditor::default();
        let a = editor.add_shape(ShapeKind::Circle).unwrap();
        editor.pointer_down_item(a, Pointer::new(100.0, 100.0), CONTAINER);
        // A second pointer-down with a resized container cannot replace the session.
        assert!(!editor.pointer_down_item(a, Pointer::new(100.0, 100.0), (800.0, 600.0)));
        match editor.session() {
            InteractionSession::Dragging(drag) => assert_eq!(drag.container().width(), 400.0),
            other => panic!("expected drag, got {other:?}"),
        }
        editor.pointer_move(Pointer::new(140.0, 130.0));
        assert_eq!(layer_xy(&editor, a), (60.0, 60.0));
    }

    #[test]
    fn pointer_leave_commits_last_position() {
        let mut editor = CustomizationEditor::default();
        let a = editor.add_shape(ShapeKind::Heart).unwrap();
        editor.pointer_down_item(a, Pointer::new(0.0, 0.0), CONTAINER);
        editor.pointer_move(Pointer::new(-80.0, 60.0));
        assert_eq!(editor.pointer_leave(), Some(a));
        assert_eq!(layer_xy(&editor, a), (30.0, 70.0));
        editor.pointer_move(Pointer::new(400.0, 400.0));
        assert_eq!(layer_xy(&editor, a), (30.0, 70.0));
    }

    #[test]
    fn degenerate_container_and_pointer_are_ignored() {
        let mut editor = CustomizationEditor::default();
        let a = editor.add_shape(ShapeKind::Circle).unwrap();
        assert!(!editor.pointer_down_item(a, Pointer::new(0.0, 0.0), (0.0, 300.0)));
        assert!(!editor.pointer_down_item(a, Pointer::new(f64::NAN, 0.0), CONTAINER));
        assert!(editor.pointer_down_item(a, Pointer::new(0.0, 0.0), CONTAINER));
        assert!(!editor.pointer_move(Pointer::new(f64::INFINITY, 0.0)));
        assert_eq!(layer_xy(&editor, a), (50.0, 50.0));
    }

    #[test]
    fn resize_handle_only_on_resizable_items() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("hi")).unwrap();
        let s = editor.add_shape(ShapeKind::Triangle).unwrap();
        assert!(!editor.pointer_down_resize_handle(t, Pointer::new(0.0, 0.0), CONTAINER));
        assert!(editor.pointer_down_resize_handle(s, Pointer::new(0.0, 0.0), CONTAINER));
        assert!(matches!(editor.session(), InteractionSession::Resizing(_)));
        editor.pointer_move(Pointer::new(-400.0, 30.0));
        editor.pointer_up();
        assert_eq!(editor.customization().get(s).unwrap().size(), Some((5.0, 58.0)));
        assert_eq!(layer_xy(&editor, s), (50.0, 50.0));
    }

    #[test]
    fn editing_text_cannot_be_dragged() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("hi")).unwrap();
        assert!(editor.double_click(t));
        assert!(!editor.pointer_down_item(t, Pointer::new(0.0, 0.0), CONTAINER));
        assert_eq!(editor.editing_id(), Some(t));
    }

    #[test]
    fn dragged_text_cannot_enter_edit_mode() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("hi")).unwrap();
        editor.pointer_down_item(t, Pointer::new(0.0, 0.0), CONTAINER);
        assert!(!editor.double_click(t));
        editor.pointer_up();
        assert!(editor.double_click(t));
    }

    #[test]
    fn double_click_on_shape_does_nothing() {
        let mut editor = CustomizationEditor::default();
        let s = editor.add_shape(ShapeKind::Square).unwrap();
        assert!(!editor.double_click(s));
        assert_eq!(editor.editing_id(), None);
    }

    #[test]
    fn clicking_empty_canvas_commits_and_deselects() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("draft")).unwrap();
        editor.double_click(t);
        editor.edit_input("final");
        editor.click_empty_canvas();
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.customization().get(t).unwrap().as_text().unwrap().value, "final");
    }

    #[test]
    fn selecting_another_item_commits_the_edit() {
        let mut editor = CustomizationEditor::default();
        let s = editor.add_shape(ShapeKind::Circle).unwrap();
        let t = editor.add_text(Some("draft")).unwrap();
        editor.double_click(t);
        editor.edit_input("kept");
        assert!(editor.select(s));
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.selected(), Some(s));
        assert_eq!(editor.customization().get(t).unwrap().as_text().unwrap().value, "kept");
    }

    #[test]
    fn reselecting_the_edited_text_keeps_editing() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("draft")).unwrap();
        editor.double_click(t);
        editor.edit_input("still typing");
        assert!(editor.select(t));
        assert_eq!(editor.editing_id(), Some(t));
        assert_eq!(editor.customization().get(t).unwrap().as_text().unwrap().value, "draft");
    }

    #[test]
    fn adding_an_item_commits_the_edit() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("draft")).unwrap();
        editor.double_click(t);
        editor.edit_input("done");
        let s = editor.add_shape(ShapeKind::Star).unwrap();
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.selected(), Some(s));
        assert_eq!(editor.customization().get(t).unwrap().as_text().unwrap().value, "done");
    }

    #[test]
    fn click_after_releasing_a_drag_keeps_the_selection() {
        let mut editor = CustomizationEditor::default();
        let s = editor.add_shape(ShapeKind::Square).unwrap();
        editor.pointer_down_item(s, Pointer::new(0.0, 0.0), CONTAINER);
        editor.pointer_move(Pointer::new(300.0, 0.0));
        assert_eq!(editor.pointer_up(), Some(s));

        // Released over empty canvas: the trailing click is part of the drag.
        editor.click_empty_canvas();
        assert_eq!(editor.selected(), Some(s));
        editor.click_empty_canvas();
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn pointer_up_without_a_gesture_does_not_swallow_clicks() {
        let mut editor = CustomizationEditor::default();
        editor.add_shape(ShapeKind::Circle).unwrap();
        assert_eq!(editor.pointer_up(), None);
        editor.click_empty_canvas();
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn frame_shows_edit_buffer_and_overlay() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("abc")).unwrap();
        editor.double_click(t);
        editor.edit_input("abcd");
        let frame = editor.frame();
        assert!(matches!(&frame.paint[0].visual, Visual::TextInput(run) if run.text == "abcd"));
        assert_eq!(frame.overlay.map(|o| o.id), Some(t));
        // Uncommitted text is not exported.
        assert_eq!(editor.document().texts[0].value, "abc");
    }

    #[test]
    fn delete_clears_attached_state() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("bye")).unwrap();
        editor.double_click(t);
        assert!(editor.delete_selected());
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.editing_id(), None);
        assert!(editor.customization().is_empty());

        let s = editor.add_shape(ShapeKind::Circle).unwrap();
        editor.pointer_down_item(s, Pointer::new(0.0, 0.0), CONTAINER);
        assert!(editor.delete(s));
        assert!(editor.session().is_idle());
        assert!(!editor.delete(s));
    }

    #[test]
    fn reorders_renumber_periodically() {
        let config = EngineConfig {
            renumber_every: Some(4),
            ..EngineConfig::default()
        };
        let mut editor = CustomizationEditor::new(config);
        let a = editor.add_shape(ShapeKind::Circle).unwrap();
        let b = editor.add_shape(ShapeKind::Square).unwrap();
        for _ in 0..2 {
            editor.bring_to_front(a);
            editor.bring_to_front(b);
        }
        let zs: Vec<i64> = editor.customization().paint_order().iter().map(|l| l.z_index).collect();
        assert_eq!(zs, vec![1, 2]);
        assert_eq!(editor.customization().paint_order()[1].id, b);
    }

    #[test]
    fn failed_reorders_are_not_counted() {
        let config = EngineConfig {
            renumber_every: Some(1),
            ..EngineConfig::default()
        };
        let mut editor = CustomizationEditor::new(config);
        let a = editor.add_shape(ShapeKind::Circle).unwrap();
        let b = editor.add_shape(ShapeKind::Circle).unwrap();
        assert!(!editor.bring_forward(b));
        assert_eq!(editor.customization().get(b).unwrap().z_index, 2);
        assert!(editor.send_to_back(b));
        assert_eq!(editor.customization().get(b).unwrap().z_index, 1);
        assert_eq!(editor.customization().get(a).unwrap().z_index, 2);
    }

    #[test]
    fn reorders_are_not_counted_when_renumbering_is_off() {
        let config = EngineConfig {
            renumber_every: None,
            ..EngineConfig::default()
        };
        let mut editor = CustomizationEditor::new(config);
        let a = editor.add_shape(ShapeKind::Circle).unwrap();
        editor.add_shape(ShapeKind::Square).unwrap();
        editor.reorders = u32::MAX;
        assert!(editor.bring_to_front(a));
        assert!(editor.send_to_back(a));
        assert_eq!(editor.reorders, u32::MAX);
        assert_eq!(editor.customization().get(a).unwrap().z_index, 1);
    }

    #[test]
    fn read_only_editor_ignores_input() {
        let mut source = CustomizationEditor::default();
        let s = source.add_shape(ShapeKind::Star).unwrap();
        source.select(s);
        let doc = source.document();

        let mut view = CustomizationEditor::read_only(&doc, EngineConfig::default()).unwrap();
        let id = view.customization().layers()[0].id;
        assert!(view.add_text(None).is_none());
        assert!(!view.select(id));
        assert!(!view.pointer_down_item(id, Pointer::new(0.0, 0.0), CONTAINER));
        assert!(!view.bring_to_front(id));
        assert!(!view.delete(id));
        assert!(view.frame().overlay.is_none());
        assert_eq!(view.document(), doc);
    }

    #[test]
    fn upload_places_image_with_aspect_ratio() {
        let mut editor = CustomizationEditor::default();
        let mut uploader = LocalBlobUploader::new();
        let file = RawImage {
            file_name: "logo.png".to_string(),
            bytes: png_bytes(60, 30),
        };
        let id = editor.upload_image(&mut uploader, &file).unwrap().unwrap();
        let layer = editor.customization().get(id).unwrap();
        assert_eq!(layer.size(), Some((30.0, 15.0)));
        assert_eq!(editor.document().images[0].url, "blob:local/1");
    }

    struct FlakyCart {
        fail: bool,
        lines: Vec<CartLine>,
    }

    impl CartCollaborator for FlakyCart {
        fn add_line(&mut self, line: &CartLine) -> Result<(), TransientIoError> {
            if self.fail {
                return Err(TransientIoError::CartSubmission("connection reset".to_string()));
            }
            self.lines.push(line.clone());
            Ok(())
        }
    }

    fn product() -> ProductContext {
        ProductContext {
            product_id: "mug".to_string(),
            base_image_url: "https://cdn.example.com/mug.png".to_string(),
            colors: vec!["white".to_string()],
            sizes: vec!["11oz".to_string()],
        }
    }

    #[test]
    fn add_to_cart_validates_then_submits() {
        let mut editor = CustomizationEditor::default();
        let t = editor.add_text(Some("Hi")).unwrap();
        editor.double_click(t);
        editor.edit_input("Hi mom");

        let mut cart = FlakyCart { fail: false, lines: Vec::new() };
        let missing = LineSelection {
            size: None,
            color: Some("white".to_string()),
            quantity: 1,
        };
        let err = editor.add_to_cart(&product(), &missing, &mut cart).unwrap_err();
        assert_eq!(err, EditorError::Validation(ValidationError::MissingSize));
        assert!(cart.lines.is_empty());
        assert_eq!(editor.editing_id(), Some(t));

        let ok = LineSelection {
            size: Some("11oz".to_string()),
            ..missing
        };
        let line = editor.add_to_cart(&product(), &ok, &mut cart).unwrap();
        assert_eq!(line.customization.texts[0].value, "Hi mom");
        assert_eq!(cart.lines.len(), 1);

        // Edits after submission do not reach the submitted line.
        editor.set_color(t, "#ff0000");
        assert_eq!(cart.lines[0].customization.texts[0].color, "#000000");
    }

    #[test]
    fn transient_failure_leaves_editor_intact() {
        let mut editor = CustomizationEditor::default();
        editor.add_shape(ShapeKind::Heart).unwrap();
        let before = editor.document();
        let mut cart = FlakyCart { fail: true, lines: Vec::new() };
        let selection = LineSelection {
            size: Some("11oz".to_string()),
            color: Some("white".to_string()),
            quantity: 2,
        };
        match editor.add_to_cart(&product(), &selection, &mut cart) {
            Err(EditorError::TransientIo(err)) => assert!(err.retryable()),
            other => panic!("expected transient error, got {other:?}"),
        }
        assert_eq!(editor.document(), before);
    }
}
