use decal_core::{Customization, ShapeKind};
use decal_editor::{CustomizationEditor, Pointer};
use proptest::prelude::*;

const CONTAINER: (f64, f64) = (400.0, 300.0);

#[derive(Debug, Clone, Copy)]
enum Reorder {
    Forward,
    Backward,
    Front,
    Back,
}

fn gesture() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-2000.0..2000.0f64, -2000.0..2000.0f64), 1..8)
}

fn reorder() -> impl Strategy<Value = Reorder> {
    prop_oneof![
        Just(Reorder::Forward),
        Just(Reorder::Backward),
        Just(Reorder::Front),
        Just(Reorder::Back),
    ]
}

fn editor_with_items(kinds: &[ShapeKind], texts: usize) -> CustomizationEditor {
    let mut editor = CustomizationEditor::default();
    for _ in 0..texts {
        editor.add_text(None);
    }
    for kind in kinds {
        editor.add_shape(*kind);
    }
    editor
}

fn ids(model: &Customization) -> Vec<decal_core::ItemId> {
    model.layers().iter().map(|layer| layer.id).collect()
}

proptest! {
    #[test]
    fn drags_keep_items_inside_the_container(
        gestures in prop::collection::vec((0usize..4, gesture()), 1..10),
        leave in any::<bool>(),
    ) {
        let mut editor = editor_with_items(&[ShapeKind::Circle, ShapeKind::Star], 2);
        let all = ids(editor.customization());
        for (target, moves) in gestures {
            editor.pointer_down_item(all[target], Pointer::new(0.0, 0.0), CONTAINER);
            for (x, y) in moves {
                editor.pointer_move(Pointer::new(x, y));
            }
            if leave {
                editor.pointer_leave();
            } else {
                editor.pointer_up();
            }
            for layer in editor.customization().layers() {
                prop_assert!((0.0..=100.0).contains(&layer.relative_x));
                prop_assert!((0.0..=100.0).contains(&layer.relative_y));
            }
        }
    }

    #[test]
    fn resizes_never_go_below_the_minimum(
        gestures in prop::collection::vec((0usize..3, gesture()), 1..10),
    ) {
        let shapes = [ShapeKind::Square, ShapeKind::Heart, ShapeKind::Triangle];
        let mut editor = editor_with_items(&shapes, 0);
        let all = ids(editor.customization());
        for (target, moves) in gestures {
            editor.pointer_down_resize_handle(all[target], Pointer::new(0.0, 0.0), CONTAINER);
            for (x, y) in moves {
                editor.pointer_move(Pointer::new(x, y));
            }
            editor.pointer_up();
            for layer in editor.customization().layers() {
                let (w, h) = layer.size().unwrap();
                prop_assert!(w >= 5.0 && h >= 5.0);
            }
        }
    }

    #[test]
    fn front_and_back_are_global_extremes(
        shapes in prop::collection::vec(prop::sample::select(ShapeKind::ALL.to_vec()), 1..6),
        texts in 0usize..3,
        shuffles in prop::collection::vec((0usize..8, reorder()), 0..20),
        target in 0usize..8,
        to_front in any::<bool>(),
    ) {
        let mut editor = editor_with_items(&shapes, texts);
        let all = ids(editor.customization());
        for (idx, op) in shuffles {
            let id = all[idx % all.len()];
            match op {
                Reorder::Forward => editor.bring_forward(id),
                Reorder::Backward => editor.send_backward(id),
                Reorder::Front => editor.bring_to_front(id),
                Reorder::Back => editor.send_to_back(id),
            };
        }

        let id = all[target % all.len()];
        if to_front {
            editor.bring_to_front(id);
        } else {
            editor.send_to_back(id);
        }

        let order = editor.customization().paint_order();
        let z = editor.customization().get(id).unwrap().z_index;
        let mut others = order.iter().filter(|layer| layer.id != id);
        if to_front {
            prop_assert_eq!(order.last().map(|layer| layer.id), Some(id));
            prop_assert!(others.all(|layer| layer.z_index < z));
        } else {
            prop_assert_eq!(order.first().map(|layer| layer.id), Some(id));
            prop_assert!(others.all(|layer| layer.z_index > z));
        }
    }
}
