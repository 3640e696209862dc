//! Keeping bookmark paths in step with files being renamed or deleted.

use std::path::{Path, PathBuf};

use crate::models::{Entry, EntryKind};
use crate::store::EntryStore;

/// A file or directory moved from `old_path` to `new_path`.
///
/// `is_directory` comes from the host after the move; it decides whether
/// bookmarks below `old_path` are rewritten or only exact matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRename {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub is_directory: bool,
}

impl FileRename {
    pub fn file(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            is_directory: false,
        }
    }

    pub fn directory(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            is_directory: true,
        }
    }

    /// Where `path` lives after this rename, if the rename affects it
    fn rebase(&self, path: &Path) -> Option<PathBuf> {
        if path == self.old_path {
            return Some(self.new_path.clone());
        }
        if !self.is_directory {
            return None;
        }
        let rest = path.strip_prefix(&self.old_path).ok()?;
        Some(self.new_path.join(rest))
    }
}

/// Apply a batch of renames in order, returning the labels of bookmarks whose
/// path changed
pub fn apply_renames(store: &mut EntryStore, renames: &[FileRename]) -> Vec<String> {
    let mut changed = Vec::new();
    for rename in renames {
        for Entry { label, kind, .. } in &mut store.entries {
            let EntryKind::Bookmark(anchor) = kind else {
                continue;
            };
            if let Some(new_path) = rename.rebase(&anchor.file_path) {
                log::debug!(
                    "Bookmark <{label}> follows {} to {}",
                    anchor.file_path.display(),
                    new_path.display()
                );
                anchor.file_path = new_path;
                if !changed.contains(&*label) {
                    changed.push(label.clone());
                }
            }
        }
    }
    changed
}

/// Remove every bookmark in or below one of the deleted paths.
///
/// Returns the removed bookmarks in store order.
pub fn apply_deletions<P: AsRef<Path>>(store: &mut EntryStore, deleted: &[P]) -> Vec<Entry> {
    let is_deleted = |entry: &Entry| {
        entry.file_path().is_some_and(|file_path| {
            deleted
                .iter()
                .any(|deleted| file_path.starts_with(deleted.as_ref()))
        })
    };

    let (removed, kept): (Vec<Entry>, Vec<Entry>) =
        std::mem::take(&mut store.entries).into_iter().partition(is_deleted);
    store.entries = kept;

    for entry in &removed {
        log::info!("Removing bookmark <{}>: its file was deleted", entry.label);
    }
    removed
}
