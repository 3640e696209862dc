//! Reordering and reparenting over the flat entry sequence.
//!
//! These are the drag-and-drop operations of the tree view. Entries are
//! addressed by label; unknown labels make a move a no-op.

use crate::store::{EntryStore, StoreError};

impl EntryStore {
    /// Move `source` to sit immediately before `target`.
    ///
    /// Returns false, changing nothing, when either label is unknown, they
    /// are the same entry, or the source already sits before the target.
    pub fn move_before(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let (Some(source_index), Some(target_index)) = (self.position(source), self.position(target))
        else {
            return false;
        };

        // Removing the source shifts a later target one slot to the left
        let insert_at = if target_index > source_index {
            target_index - 1
        } else {
            target_index
        };
        if insert_at == source_index {
            return false;
        }
        let entry = self.entries.remove(source_index);
        self.entries.insert(insert_at, entry);
        true
    }

    /// Move every source to sit immediately before `target`, keeping the
    /// sources' relative order.
    ///
    /// Sources are processed last to first; each one lands before the one
    /// placed just before it.
    pub fn move_many_before<S: AsRef<str>>(&mut self, sources: &[S], target: &str) -> bool {
        let mut anchor = target.to_string();
        let mut moved = false;
        for source in sources.iter().rev() {
            let source = source.as_ref();
            if source == anchor || !self.is_label_used(source) {
                continue;
            }
            moved |= self.move_before(source, &anchor);
            anchor = source.to_string();
        }
        moved
    }

    /// Move `source` to the end of the sequence.
    ///
    /// Does nothing with fewer than two entries.
    pub fn move_to_back(&mut self, source: &str) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        let Some(index) = self.position(source) else {
            return false;
        };
        if index == self.entries.len() - 1 {
            return false;
        }
        let entry = self.entries.remove(index);
        self.entries.push(entry);
        true
    }

    /// Move each source to the back in turn, so they end up last in the given order
    pub fn move_many_to_back<S: AsRef<str>>(&mut self, sources: &[S]) -> bool {
        let mut moved = false;
        for source in sources {
            moved |= self.move_to_back(source.as_ref());
        }
        moved
    }

    /// Drop `sources` onto `target`.
    ///
    /// - No target: sources move to the top level, at the back.
    /// - Group target: sources move into the group.
    /// - Bookmark target: sources become siblings of the bookmark.
    ///
    /// In the last two cases the sources are then placed just before the
    /// target. A drop that would make a group its own descendant is rejected
    /// without changing anything. Unknown sources are ignored.
    ///
    /// Returns whether any group or position changed.
    pub fn reparent<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        target: Option<&str>,
    ) -> Result<bool, StoreError> {
        let sources: Vec<&str> = sources
            .iter()
            .map(AsRef::as_ref)
            .filter(|source| self.is_label_used(source))
            .collect();

        let Some(target) = target else {
            let regrouped = self.set_group(&sources, None);
            let moved = self.move_many_to_back(&sources);
            return Ok(regrouped || moved);
        };

        let target_entry = self
            .by_label(target)
            .ok_or_else(|| StoreError::UnknownLabel(target.to_string()))?;
        let new_group = if target_entry.is_group() {
            Some(target_entry.label.clone())
        } else {
            target_entry.group.clone()
        };

        if let Some(new_group) = &new_group {
            for source in &sources {
                if *source == new_group || self.is_descendant_of(new_group, source) {
                    log::warn!("Rejecting drop of <{source}> onto <{target}>: would create a cycle");
                    return Err(StoreError::CyclicReparent {
                        source_label: source.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        let regrouped = self.set_group(&sources, new_group);
        let moved = self.move_many_before(&sources, target);
        Ok(regrouped || moved)
    }

    fn set_group(&mut self, sources: &[&str], group: Option<String>) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            if sources.contains(&entry.label.as_str()) && entry.group != group {
                entry.group = group.clone();
                changed = true;
            }
        }
        changed
    }
}
