use decal_core::{Customization, ItemId};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
struct EditBuffer {
    id: ItemId,
    buffer: String,
}

/// Inline editing of at most one text layer.
///
/// There is no cancel path: whatever ends an edit (blur, another selection, a click on the
/// empty canvas) commits the buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEditingController {
    editing: Option<EditBuffer>,
}

impl TextEditingController {
    pub fn editing_id(&self) -> Option<ItemId> {
        self.editing.as_ref().map(|edit| edit.id)
    }

    pub fn buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|edit| edit.buffer.as_str())
    }

    /// Starts editing a text layer, committing any edit already open.
    pub fn begin(&mut self, model: &mut Customization, id: ItemId) -> bool {
        if self.editing_id() == Some(id) {
            return true;
        }
        let Some(value) = model.get(id).and_then(|layer| layer.as_text()).map(|t| t.value.clone())
        else {
            return false;
        };
        self.commit(model);
        debug!(%id, "Text edit started");
        self.editing = Some(EditBuffer { id, buffer: value });
        true
    }

    pub fn input(&mut self, text: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(edit) => {
                edit.buffer = text.into();
                true
            }
            None => false,
        }
    }

    /// Writes the buffer into the model and leaves edit mode.
    pub fn commit(&mut self, model: &mut Customization) -> Option<ItemId> {
        let edit = self.editing.take()?;
        model.set_text_value(edit.id, edit.buffer);
        debug!(id = %edit.id, "Text edit committed");
        Some(edit.id)
    }

    /// Commits only if `id` is the layer being edited.
    pub fn blur(&mut self, model: &mut Customization, id: ItemId) -> bool {
        if self.editing_id() != Some(id) {
            return false;
        }
        self.commit(model).is_some()
    }

    /// Drops the edit without committing, for a layer that no longer exists.
    pub(crate) fn forget(&mut self, id: ItemId) {
        if self.editing_id() == Some(id) {
            self.editing = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal_core::{Item, TextItem};

    fn add_text(model: &mut Customization, value: &str) -> ItemId {
        model.insert(
            Item::Text(TextItem {
                value: value.to_string(),
                font_size: 22.0,
                font_family: "Arial".to_string(),
                color: "#000000".to_string(),
            }),
            50.0,
            50.0,
        )
    }

    fn value(model: &Customization, id: ItemId) -> String {
        model.get(id).unwrap().as_text().unwrap().value.clone()
    }

    #[test]
    fn blur_commits_the_buffer() {
        let mut model = Customization::new();
        let id = add_text(&mut model, "Hello");
        let mut edit = TextEditingController::default();

        assert!(edit.begin(&mut model, id));
        assert_eq!(edit.buffer(), Some("Hello"));
        edit.input("Hello there");
        assert_eq!(value(&model, id), "Hello");

        assert!(edit.blur(&mut model, id));
        assert_eq!(value(&model, id), "Hello there");
        assert_eq!(edit.editing_id(), None);
        assert!(!edit.blur(&mut model, id));
    }

    #[test]
    fn starting_another_edit_commits_the_first() {
        let mut model = Customization::new();
        let a = add_text(&mut model, "a");
        let b = add_text(&mut model, "b");
        let mut edit = TextEditingController::default();

        edit.begin(&mut model, a);
        edit.input("aa");
        edit.begin(&mut model, b);
        assert_eq!(value(&model, a), "aa");
        assert_eq!(edit.editing_id(), Some(b));
    }

    #[test]
    fn blur_of_another_item_is_ignored() {
        let mut model = Customization::new();
        let a = add_text(&mut model, "a");
        let b = add_text(&mut model, "b");
        let mut edit = TextEditingController::default();
        edit.begin(&mut model, a);
        edit.input("changed");
        assert!(!edit.blur(&mut model, b));
        assert_eq!(edit.buffer(), Some("changed"));
    }

    #[test]
    fn input_without_edit_is_rejected() {
        let mut edit = TextEditingController::default();
        assert!(!edit.input("nothing"));
    }
}
