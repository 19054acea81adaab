//! Property-based tests using proptest.
//!
//! These tests verify the editing invariants against a plain in-memory
//! reference model: a `Vec<u8>` that every operation is applied to eagerly.
//! Whatever sequence of edits, insertions, and deletions is generated, the
//! editor's logical view, its size accounting, its undo history, and the
//! saved file must all agree with the model.

mod common;

use common::fixture_file;
use proptest::prelude::*;
use spanedit::{Editor, EditorOptions, Natural, SaveStatus};
use tempfile::TempDir;

/// One randomly generated mutation, with positions as fractions of the
/// current model length so they stay in range as the model grows and
/// shrinks.
#[derive(Debug, Clone)]
enum Op {
    Edit { at: f64, data: Vec<u8> },
    Insert { at: f64, count: u64 },
    InsertPattern { at: f64, count: u64, pattern: Vec<u8> },
    Delete { at: f64, count: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0..1.0f64, proptest::collection::vec(any::<u8>(), 1..24))
            .prop_map(|(at, data)| Op::Edit { at, data }),
        (0.0..1.0f64, 1..40u64).prop_map(|(at, count)| Op::Insert { at, count }),
        (
            0.0..1.0f64,
            1..40u64,
            proptest::collection::vec(any::<u8>(), 1..5)
        )
            .prop_map(|(at, count, pattern)| Op::InsertPattern { at, count, pattern }),
        (0.0..1.0f64, 1..20u64).prop_map(|(at, count)| Op::Delete { at, count }),
    ]
}

/// Applies `op` to both the editor and the reference model.
fn apply(editor: &mut Editor, model: &mut Vec<u8>, op: &Op) {
    let place = |at: f64, len: usize| ((at * len as f64) as usize).min(len);
    match op {
        Op::Edit { at, data } => {
            // Clamp so the overwrite stays inside the current logical file.
            let pos = place(*at, model.len());
            let data: Vec<u8> = data.iter().copied().take(model.len() - pos).collect();
            editor.edit_bytes(Natural::new(pos as u64), data.clone()).unwrap();
            model[pos..pos + data.len()].copy_from_slice(&data);
        }
        Op::Insert { at, count } => {
            let pos = place(*at, model.len());
            editor.insert(Natural::new(pos as u64), *count).unwrap();
            model.splice(pos..pos, std::iter::repeat(0u8).take(*count as usize));
        }
        Op::InsertPattern { at, count, pattern } => {
            let pos = place(*at, model.len());
            editor
                .insert_pattern(Natural::new(pos as u64), *count, pattern)
                .unwrap();
            let tiled: Vec<u8> = (0..*count as usize).map(|i| pattern[i % pattern.len()]).collect();
            model.splice(pos..pos, tiled);
        }
        Op::Delete { at, count } => {
            let pos = place(*at, model.len());
            let count = (*count as usize).min(model.len() - pos);
            editor.delete(Natural::new(pos as u64), count as u64).unwrap();
            model.drain(pos..pos + count);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The logical view always equals the eagerly-applied model.
    #[test]
    fn view_matches_reference_model(
        source in proptest::collection::vec(any::<u8>(), 0..300),
        ops in proptest::collection::vec(op_strategy(), 1..12),
    ) {
        let dir = TempDir::new().unwrap();
        let path = fixture_file(&dir, "f.bin", &source);
        let mut editor = Editor::open_with(
            &path,
            EditorOptions::new().block_size(32).max_block_count(3),
        ).unwrap();
        let mut model = source.clone();

        for op in &ops {
            apply(&mut editor, &mut model, op);

            prop_assert_eq!(editor.size().unwrap(), model.len() as u64);
            let view = editor.read_bytes(Natural::new(0), model.len() + 16).unwrap();
            prop_assert_eq!(&view, &model);
        }
    }

    /// Saving materializes exactly the logical view, and re-opening the
    /// saved file reads it back unchanged.
    #[test]
    fn save_round_trips(
        source in proptest::collection::vec(any::<u8>(), 0..300),
        ops in proptest::collection::vec(op_strategy(), 1..10),
    ) {
        let dir = TempDir::new().unwrap();
        let path = fixture_file(&dir, "f.bin", &source);
        let destination = dir.path().join("saved.bin");
        let mut editor = Editor::open(&path).unwrap();
        let mut model = source.clone();

        for op in &ops {
            apply(&mut editor, &mut model, op);
        }

        prop_assert_eq!(editor.save_as(&destination).unwrap(), SaveStatus::Success);
        prop_assert_eq!(&std::fs::read(&destination).unwrap(), &model);
        // The source file is untouched by a save-as.
        prop_assert_eq!(&std::fs::read(&path).unwrap(), &source);

        let mut reopened = Editor::open(&destination).unwrap();
        let view = reopened.read_bytes(Natural::new(0), model.len() + 16).unwrap();
        prop_assert_eq!(&view, &model);
    }

    /// Undoing everything restores the source view byte for byte; redoing
    /// everything restores the edited view.
    #[test]
    fn undo_all_then_redo_all(
        source in proptest::collection::vec(any::<u8>(), 1..200),
        ops in proptest::collection::vec(op_strategy(), 1..10),
    ) {
        let dir = TempDir::new().unwrap();
        let path = fixture_file(&dir, "f.bin", &source);
        let mut editor = Editor::open(&path).unwrap();
        let mut model = source.clone();

        for op in &ops {
            apply(&mut editor, &mut model, op);
        }
        let edited = editor.read_bytes(Natural::new(0), model.len() + 16).unwrap();

        while editor.can_undo() {
            editor.undo();
        }
        let restored = editor.read_bytes(Natural::new(0), source.len() + 16).unwrap();
        prop_assert_eq!(&restored, &source);

        while editor.can_redo() {
            editor.redo();
        }
        let replayed = editor.read_bytes(Natural::new(0), model.len() + 16).unwrap();
        prop_assert_eq!(&replayed, &edited);
    }

    /// The in-place shift primitives agree with Vec splicing for arbitrary
    /// positions, counts, and chunk sizes.
    #[test]
    fn shift_primitives_match_vec_model(
        source in proptest::collection::vec(any::<u8>(), 0..400),
        at in 0.0..1.0f64,
        count in 0..60u64,
        chunk_size in 1..130usize,
        deletion in any::<bool>(),
    ) {
        use spanedit::{Absolute, RawFile};

        let dir = TempDir::new().unwrap();
        let path = fixture_file(&dir, "raw.bin", &source);
        let mut raw = RawFile::open(&path, true).unwrap();

        let pos = ((at * source.len() as f64) as usize).min(source.len());
        let mut model = source.clone();

        if deletion {
            let count = (count as usize).min(model.len() - pos);
            raw.delete_bytes(Absolute::new(pos as u64), count as u64, chunk_size).unwrap();
            raw.resize((model.len() - count) as u64).unwrap();
            model.drain(pos..pos + count);
        } else {
            raw.insert_bytes(Absolute::new(pos as u64), count, chunk_size).unwrap();
            model.splice(pos..pos, std::iter::repeat(0u8).take(count as usize));
        }

        prop_assert_eq!(&std::fs::read(&path).unwrap(), &model);
    }
}
