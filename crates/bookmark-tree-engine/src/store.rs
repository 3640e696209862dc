//! Ordered store of bookmarks and groups.
//!
//! The store is one flat sequence. Nesting is encoded by each entry's `group`
//! label, and sibling order is the relative order of entries sharing the same
//! `group`. There is no separate tree structure to keep in sync.

use std::collections::HashSet;

use crate::models::{Anchor, Entry, EntryRecord};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Label must not be empty")]
    EmptyLabel,
    #[error("Label <{0}> already exists")]
    DuplicateLabel(String),
    #[error("No bookmark or group labelled <{0}>")]
    UnknownLabel(String),
    #[error("<{0}> is not a group")]
    NotAGroup(String),
    #[error("Moving <{source_label}> under <{target}> would make a group its own descendant")]
    CyclicReparent { source_label: String, target: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    pub(crate) entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in store order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Append an entry. Label uniqueness is the caller's responsibility;
    /// use [`EntryStore::insert_bookmark`] or [`EntryStore::insert_group`]
    /// for checked insertion.
    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Remove the entry with this label, returning it
    pub fn remove(&mut self, label: &str) -> Option<Entry> {
        let index = self.position(label)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.label == label)
    }

    pub fn by_label(&self, label: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn by_label_mut(&mut self, label: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.label == label)
    }

    /// Bookmarks only, in store order
    pub fn bookmarks(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| !entry.is_group())
    }

    pub fn is_label_used(&self, label: &str) -> bool {
        self.entries.iter().any(|entry| entry.label == label)
    }

    /// Parents of `label`, nearest first.
    ///
    /// Stops at a group reference that does not resolve, or before revisiting
    /// an entry, so a corrupt cycle cannot loop forever and the chain never
    /// contains `label` itself.
    pub fn ancestor_chain(&self, label: &str) -> Vec<&Entry> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let Some(mut current) = self.by_label(label) else {
            return chain;
        };
        visited.insert(current.label.as_str());

        while let Some(parent) = current.group.as_deref().and_then(|group| self.by_label(group)) {
            if !visited.insert(parent.label.as_str()) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// True when `ancestor` appears in the ancestor chain of `label`
    pub fn is_descendant_of(&self, label: &str, ancestor: &str) -> bool {
        self.ancestor_chain(label)
            .iter()
            .any(|entry| entry.label == ancestor)
    }

    /// Direct children of a group, or top-level entries for `None`, in sibling order
    pub fn children_of<'a>(&'a self, parent: Option<&'a str>) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .filter(move |entry| entry.group.as_deref() == parent)
    }

    /// Labels of every entry nested under `label` at any depth, in store order
    pub fn descendants_of(&self, label: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| self.is_descendant_of(&entry.label, label))
            .map(|entry| entry.label.clone())
            .collect()
    }

    /// Entries in display order with their depth, descending into a group only
    /// when it is expanded
    pub fn flatten(&self) -> Vec<(&Entry, usize)> {
        fn collect<'a>(
            store: &'a EntryStore,
            parent: Option<&'a str>,
            depth: usize,
            visited: &mut HashSet<&'a str>,
            result: &mut Vec<(&'a Entry, usize)>,
        ) {
            for entry in store.children_of(parent) {
                if !visited.insert(entry.label.as_str()) {
                    continue;
                }
                result.push((entry, depth));
                if entry.is_group() && entry.is_expanded {
                    collect(store, Some(&entry.label), depth + 1, visited, result);
                }
            }
        }

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        collect(self, None, 0, &mut visited, &mut result);
        result
    }

    /// Persisted records in store order
    pub fn serialize(&self) -> Vec<EntryRecord> {
        self.entries.iter().map(EntryRecord::from).collect()
    }

    /// Build a store from persisted records.
    ///
    /// A record that cannot be converted, or whose label was already taken by
    /// an earlier record, is skipped so one bad entry cannot lose the rest.
    /// Group references that are dangling, point at a bookmark, or close a
    /// cycle are cleared, promoting the entry to the top level.
    pub fn deserialize(records: impl IntoIterator<Item = EntryRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            match Entry::try_from(record) {
                Ok(entry) if store.is_label_used(&entry.label) => {
                    log::warn!("Skipping duplicate persisted label <{}>", entry.label);
                }
                Ok(entry) => store.add(entry),
                Err(err) => log::warn!("Skipping persisted bookmark: {err}"),
            }
        }
        store.repair_group_references();
        store
    }

    fn repair_group_references(&mut self) {
        for index in 0..self.entries.len() {
            let Some(group) = self.entries[index].group.clone() else {
                continue;
            };
            let label = self.entries[index].label.clone();
            let parent_is_group = self.by_label(&group).is_some_and(Entry::is_group);
            if !parent_is_group || group == label || self.is_descendant_of(&group, &label) {
                log::warn!("Moving <{label}> to the top level: invalid group <{group}>");
                self.entries[index].group = None;
            }
        }
    }

    /// Append a bookmark after checking the label
    pub fn insert_bookmark(&mut self, label: &str, anchor: Anchor) -> Result<(), StoreError> {
        self.check_new_label(label)?;
        self.add(Entry::bookmark(label, anchor));
        Ok(())
    }

    /// Append a top-level group after checking the label
    pub fn insert_group(&mut self, label: &str) -> Result<(), StoreError> {
        self.check_new_label(label)?;
        self.add(Entry::group(label));
        Ok(())
    }

    /// Remove an entry; removing a group also removes everything nested under it.
    ///
    /// Returns the removed entries in store order.
    pub fn delete(&mut self, label: &str) -> Result<Vec<Entry>, StoreError> {
        if !self.is_label_used(label) {
            return Err(StoreError::UnknownLabel(label.to_string()));
        }
        let mut doomed: HashSet<String> = self.descendants_of(label).into_iter().collect();
        doomed.insert(label.to_string());

        let (removed, kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| doomed.contains(&entry.label));
        self.entries = kept;
        Ok(removed)
    }

    /// Change an entry's label. Entries grouped under the old label follow it.
    ///
    /// Returns false when the label is unchanged.
    pub fn rename(&mut self, label: &str, new_label: &str) -> Result<bool, StoreError> {
        if !self.is_label_used(label) {
            return Err(StoreError::UnknownLabel(label.to_string()));
        }
        if label == new_label {
            return Ok(false);
        }
        self.check_new_label(new_label)?;

        for entry in &mut self.entries {
            if entry.label == label {
                entry.label = new_label.to_string();
            } else if entry.group.as_deref() == Some(label) {
                entry.group = Some(new_label.to_string());
            }
        }
        Ok(true)
    }

    /// Record whether a group is expanded in the tree view
    pub fn set_expanded(&mut self, label: &str, is_expanded: bool) -> Result<(), StoreError> {
        let entry = self
            .by_label_mut(label)
            .ok_or_else(|| StoreError::UnknownLabel(label.to_string()))?;
        if !entry.is_group() {
            return Err(StoreError::NotAGroup(label.to_string()));
        }
        entry.set_expanded(is_expanded);
        Ok(())
    }

    fn check_new_label(&self, label: &str) -> Result<(), StoreError> {
        if label.trim().is_empty() {
            return Err(StoreError::EmptyLabel);
        }
        if self.is_label_used(label) {
            return Err(StoreError::DuplicateLabel(label.to_string()));
        }
        Ok(())
    }
}

impl FromIterator<Entry> for EntryStore {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{bookmark, labels, nested_store};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_appends_in_order() {
        let mut store = EntryStore::new();
        store.add(bookmark("a", "/a.rs", 0));
        store.add(Entry::group("g"));
        store.add(bookmark("b", "/b.rs", 3));

        assert_eq!(labels(&store), vec!["a", "g", "b"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove_by_label() {
        let mut store: EntryStore = [bookmark("a", "/a.rs", 0), bookmark("b", "/b.rs", 0)]
            .into_iter()
            .collect();

        let removed = store.remove("a");
        assert_eq!(removed.map(|entry| entry.label), Some("a".to_string()));
        assert_eq!(labels(&store), vec!["b"]);

        // Removing something that is not there changes nothing
        assert!(store.remove("missing").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_bookmarks_filters_groups() {
        let store = nested_store();
        let bookmarks: Vec<_> = store.bookmarks().map(|entry| entry.label.as_str()).collect();
        assert_eq!(bookmarks, vec!["intro", "parse", "lex", "readme"]);
    }

    #[test]
    fn test_ancestor_chain_nearest_first() {
        let store = nested_store();
        let chain: Vec<_> = store
            .ancestor_chain("lex")
            .iter()
            .map(|entry| entry.label.as_str())
            .collect();
        assert_eq!(chain, vec!["frontend", "compiler"]);
        assert!(store.ancestor_chain("compiler").is_empty());
        assert!(store.ancestor_chain("missing").is_empty());
    }

    #[test]
    fn test_ancestor_chain_stops_on_cycle() {
        // Given a corrupt store where two groups contain each other
        let store: EntryStore = [
            Entry::group("x").in_group("y"),
            Entry::group("y").in_group("x"),
        ]
        .into_iter()
        .collect();

        // Then the walk terminates and never reports the start entry
        let chain = store.ancestor_chain("x");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].label, "y");
    }

    #[test]
    fn test_children_of_preserves_store_order() {
        let store = nested_store();
        let top: Vec<_> = store.children_of(None).map(|e| e.label.as_str()).collect();
        let inner: Vec<_> = store
            .children_of(Some("compiler"))
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(top, vec!["intro", "compiler", "readme"]);
        assert_eq!(inner, vec!["parse", "frontend"]);
    }

    #[test]
    fn test_insert_rejects_duplicate_and_empty_labels() {
        let mut store = nested_store();
        let before = store.clone();

        assert_eq!(
            store.insert_group("parse"),
            Err(StoreError::DuplicateLabel("parse".to_string()))
        );
        assert_eq!(
            store.insert_bookmark("  ", Anchor::new("/x.rs", 0, "")),
            Err(StoreError::EmptyLabel)
        );
        assert_eq!(store, before);

        store.insert_group("new").unwrap();
        assert_eq!(store.entries().last().map(|e| e.label.as_str()), Some("new"));
    }

    #[test]
    fn test_delete_group_cascades_transitively() {
        let mut store = nested_store();

        let removed = store.delete("compiler").unwrap();

        let removed: Vec<_> = removed.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(removed, vec!["compiler", "parse", "frontend", "lex"]);
        assert_eq!(labels(&store), vec!["intro", "readme"]);
    }

    #[test]
    fn test_delete_bookmark_leaves_siblings() {
        let mut store = nested_store();
        store.delete("parse").unwrap();
        assert_eq!(
            labels(&store),
            vec!["intro", "compiler", "frontend", "lex", "readme"]
        );
        assert_eq!(
            store.delete("parse"),
            Err(StoreError::UnknownLabel("parse".to_string()))
        );
    }

    #[test]
    fn test_rename_group_moves_children_along() {
        let mut store = nested_store();

        store.rename("frontend", "front").unwrap();

        assert_eq!(store.by_label("lex").unwrap().group.as_deref(), Some("front"));
        assert!(store.by_label("frontend").is_none());
        assert_eq!(store.ancestor_chain("lex").len(), 2);
    }

    #[test]
    fn test_rename_to_used_label_is_rejected() {
        let mut store = nested_store();
        let before = store.clone();

        assert_eq!(
            store.rename("lex", "readme"),
            Err(StoreError::DuplicateLabel("readme".to_string()))
        );
        assert_eq!(store, before);
        assert_eq!(store.rename("lex", "lex"), Ok(false));
    }

    #[test]
    fn test_set_expanded_only_on_groups() {
        let mut store = nested_store();
        store.set_expanded("frontend", false).unwrap();
        assert!(!store.by_label("frontend").unwrap().is_expanded);
        assert_eq!(
            store.set_expanded("lex", true),
            Err(StoreError::NotAGroup("lex".to_string()))
        );
    }

    #[test]
    fn test_flatten_skips_collapsed_groups() {
        let mut store = nested_store();
        let depths: Vec<_> = store
            .flatten()
            .iter()
            .map(|(entry, depth)| (entry.label.as_str(), *depth))
            .collect();
        assert_eq!(
            depths,
            vec![
                ("intro", 0),
                ("compiler", 0),
                ("parse", 1),
                ("frontend", 1),
                ("lex", 2),
                ("readme", 0),
            ]
        );

        store.set_expanded("compiler", false).unwrap();
        let visible: Vec<_> = store.flatten().iter().map(|(e, _)| e.label.clone()).collect();
        assert_eq!(visible, vec!["intro", "compiler", "readme"]);
    }

    #[test]
    fn test_serialize_round_trip() {
        let store = nested_store();
        let restored = EntryStore::deserialize(store.serialize());
        assert_eq!(restored, store);
    }

    #[test]
    fn test_records_without_expansion_flag_round_trip() {
        let input = serde_json::json!([
            {"label": "g"},
            {"label": "b", "filePath": "/a.rs", "lineNumber": 1, "text": "x", "group": "g"}
        ]);
        let records: Vec<EntryRecord> = serde_json::from_value(input.clone()).unwrap();

        let output = serde_json::to_value(EntryStore::deserialize(records).serialize()).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn test_deserialize_skips_malformed_and_duplicate_records() {
        let records = vec![
            EntryRecord {
                label: Some("ok".to_string()),
                ..Default::default()
            },
            EntryRecord::default(),
            EntryRecord {
                label: Some("ok".to_string()),
                file_path: Some("/a.rs".to_string()),
                line_number: Some(1),
                text: Some("x".to_string()),
                ..Default::default()
            },
        ];

        let store = EntryStore::deserialize(records);

        assert_eq!(labels(&store), vec!["ok"]);
        assert!(store.by_label("ok").unwrap().is_group());
    }

    #[test]
    fn test_deserialize_promotes_invalid_group_references() {
        let store: EntryStore = [
            Entry::group("x").in_group("y"),
            Entry::group("y").in_group("x"),
            bookmark("orphan", "/a.rs", 0).in_group("gone"),
            bookmark("under-bookmark", "/a.rs", 1).in_group("orphan"),
        ]
        .into_iter()
        .collect();

        let repaired = EntryStore::deserialize(store.serialize());

        assert_eq!(repaired.by_label("x").unwrap().group, None);
        assert_eq!(repaired.by_label("y").unwrap().group.as_deref(), Some("x"));
        assert_eq!(repaired.by_label("orphan").unwrap().group, None);
        assert_eq!(repaired.by_label("under-bookmark").unwrap().group, None);
    }
}
