//! A bookmark session: the store plus its persistence and view refresh.
//!
//! Every operation that changes the store saves once and notifies the view
//! once. Rejected operations, and accepted ones that leave the store as it
//! was, do neither.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::editing::{LineSource, ReanchorReport, TextChange, reanchor_changes};
use crate::file_events::{FileRename, apply_deletions, apply_renames};
use crate::io::{IoError, Persistence};
use crate::models::{Anchor, Entry};
use crate::store::{EntryStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("{} has no line {}", path.display(), line + 1)]
    LineOutOfRange { path: PathBuf, line: usize },
}

pub struct BookmarkSession<P: Persistence> {
    store: EntryStore,
    persistence: P,
    on_refresh: Option<Box<dyn FnMut()>>,
}

impl<P: Persistence + fmt::Debug> fmt::Debug for BookmarkSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookmarkSession")
            .field("store", &self.store)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}

impl<P: Persistence> BookmarkSession<P> {
    /// Load the saved entries. Malformed records are skipped.
    pub fn open(persistence: P) -> Result<Self, SessionError> {
        let store = EntryStore::deserialize(persistence.load()?);
        log::info!("Loaded {} bookmarks and groups", store.len());
        Ok(Self {
            store,
            persistence,
            on_refresh: None,
        })
    }

    /// Call `refresh` after every change so a view can re-read the store
    pub fn on_refresh(mut self, refresh: impl FnMut() + 'static) -> Self {
        self.on_refresh = Some(Box::new(refresh));
        self
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Save, then refresh the view. The view is refreshed even when the save
    /// fails, as the in-memory store has already changed.
    fn commit(&mut self) -> Result<(), SessionError> {
        let saved = self.persistence.save(&self.store.serialize());
        if let Some(refresh) = self.on_refresh.as_mut() {
            refresh();
        }
        saved?;
        Ok(())
    }

    /// Bookmark `line` of `file_path`, caching the trimmed line from `doc`
    pub fn add_bookmark<D: LineSource + ?Sized>(
        &mut self,
        label: &str,
        file_path: impl Into<PathBuf>,
        line: usize,
        doc: &D,
    ) -> Result<(), SessionError> {
        let file_path = file_path.into();
        let text = doc
            .snippet(line)
            .ok_or_else(|| SessionError::LineOutOfRange {
                path: file_path.clone(),
                line,
            })?;
        self.store
            .insert_bookmark(label, Anchor::new(file_path, line, text))?;
        log::info!("Bookmark <{label}> added");
        self.commit()
    }

    pub fn add_group(&mut self, label: &str) -> Result<(), SessionError> {
        self.store.insert_group(label)?;
        log::info!("Group <{label}> added");
        self.commit()
    }

    /// Remove a bookmark, or a group with everything nested in it
    pub fn remove(&mut self, label: &str) -> Result<Vec<Entry>, SessionError> {
        let removed = self.store.delete(label)?;
        self.commit()?;
        Ok(removed)
    }

    /// Remove every bookmark and group
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.store.clear();
        self.commit()
    }

    pub fn rename(&mut self, label: &str, new_label: &str) -> Result<(), SessionError> {
        if self.store.rename(label, new_label)? {
            self.commit()?;
        }
        Ok(())
    }

    pub fn set_expanded(&mut self, label: &str, is_expanded: bool) -> Result<(), SessionError> {
        self.store.set_expanded(label, is_expanded)?;
        self.commit()
    }

    /// Follow one change event in `file_path`; `doc` is the document after the change.
    ///
    /// Saves only when a bookmark was affected.
    pub fn apply_text_change<D: LineSource + ?Sized>(
        &mut self,
        file_path: &Path,
        changes: &[TextChange],
        doc: &D,
    ) -> Result<ReanchorReport, SessionError> {
        let report = reanchor_changes(&mut self.store, file_path, changes, doc);
        if !report.is_empty() {
            self.commit()?;
        }
        Ok(report)
    }

    /// Apply a whole batch of renames, then save once.
    ///
    /// Each rename must already know whether it moved a directory.
    pub fn apply_renames(&mut self, renames: &[FileRename]) -> Result<Vec<String>, SessionError> {
        let changed = apply_renames(&mut self.store, renames);
        if !changed.is_empty() {
            self.commit()?;
        }
        Ok(changed)
    }

    /// Drop bookmarks in or below deleted paths; saves only if one was removed
    pub fn apply_deletions<Q: AsRef<Path>>(&mut self, deleted: &[Q]) -> Result<Vec<Entry>, SessionError> {
        let removed = apply_deletions(&mut self.store, deleted);
        if !removed.is_empty() {
            self.commit()?;
        }
        Ok(removed)
    }

    /// Drag-and-drop of `sources` onto `target`, or outside every entry for `None`
    pub fn drop_onto<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        target: Option<&str>,
    ) -> Result<(), SessionError> {
        if self.store.reparent(sources, target)? {
            self.commit()?;
        }
        Ok(())
    }

    /// Display strings of every bookmark, for a picker
    pub fn quick_pick_items(&self) -> Vec<String> {
        self.store.bookmarks().map(ToString::to_string).collect()
    }

    /// The bookmark whose display string is `item`
    pub fn find_by_display(&self, item: &str) -> Option<&Entry> {
        self.store.bookmarks().find(|entry| entry.to_string() == item)
    }

    /// File and 0-based line to navigate to for a bookmark
    pub fn location(&self, label: &str) -> Option<(&Path, usize)> {
        let anchor = self.store.by_label(label)?.anchor()?;
        Some((anchor.file_path.as_path(), anchor.line_number))
    }
}
