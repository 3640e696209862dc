/*!
 * # Editing
 *
 * Follows document edits so bookmarks stay on the line they were placed on.
 *
 * - **`change`**: `TextChange` as reported by the host editor and the
 *   line-level `EditOp` derived from it
 * - **`document`**: `LineSource`, read access to the live document
 *   (implemented for `str`, `String` and `xi_rope::Rope`)
 * - **`reanchor`**: the per-bookmark shift / refresh / delete pass
 *
 * ```rust
 * use bookmark_tree_engine::{Anchor, EntryStore, Position, TextChange, reanchor_changes};
 * use std::path::Path;
 *
 * let mut store = EntryStore::new();
 * store.insert_bookmark("todo", Anchor::new("/notes.txt", 2, "fix me")).unwrap();
 *
 * // Two lines typed at the very top of the file
 * let doc = "a\nb\nline 0\nline 1\nfix me";
 * let change = TextChange::insert(Position::new(0, 0), "a\nb\n");
 * reanchor_changes(&mut store, Path::new("/notes.txt"), &[change], doc);
 *
 * assert_eq!(store.by_label("todo").unwrap().anchor().unwrap().line_number, 4);
 * ```
 */

pub mod change;
pub mod document;
pub mod reanchor;

pub use change::{EditOp, Position, TextChange};
pub use document::LineSource;
pub use reanchor::{ReanchorReport, reanchor};

use std::path::Path;

use crate::store::EntryStore;

/// Reanchor bookmarks in `file_path` for one change event as reported by the host
pub fn reanchor_changes<D: LineSource + ?Sized>(
    store: &mut EntryStore,
    file_path: &Path,
    changes: &[TextChange],
    doc: &D,
) -> ReanchorReport {
    let ops: Vec<EditOp> = changes.iter().map(EditOp::from).collect();
    reanchor(store, file_path, &ops, doc)
}
