use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a bookmark points in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub file_path: PathBuf,
    /// 0-based line number
    pub line_number: usize,
    /// Trimmed snippet of the line, cached at creation or at the last edit touching it
    pub text: String,
}

impl Anchor {
    pub fn new(file_path: impl Into<PathBuf>, line_number: usize, text: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Bookmark(Anchor),
    Group,
}

/// A unit of the ordered store: a bookmark or a group of entries.
///
/// Entries reference their parent group by label; the label is unique across
/// the whole store.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub label: String,
    pub group: Option<String>,
    pub is_expanded: bool,
    pub kind: EntryKind,
    /// `isExpanded` is written back: the loaded record had it, or it was set since
    pub(crate) records_expanded: bool,
    /// Persisted fields this version does not understand, written back untouched
    pub(crate) extra: Map<String, Value>,
}

impl Entry {
    pub fn bookmark(label: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            label: label.into(),
            group: None,
            is_expanded: false,
            kind: EntryKind::Bookmark(anchor),
            records_expanded: true,
            extra: Map::new(),
        }
    }

    pub fn group(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            group: None,
            is_expanded: false,
            kind: EntryKind::Group,
            records_expanded: true,
            extra: Map::new(),
        }
    }

    /// Place the entry inside the group with the given label
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn expanded(mut self, is_expanded: bool) -> Self {
        self.set_expanded(is_expanded);
        self
    }

    pub fn set_expanded(&mut self, is_expanded: bool) {
        self.is_expanded = is_expanded;
        self.records_expanded = true;
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, EntryKind::Group)
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        match &self.kind {
            EntryKind::Bookmark(anchor) => Some(anchor),
            EntryKind::Group => None,
        }
    }

    pub fn anchor_mut(&mut self) -> Option<&mut Anchor> {
        match &mut self.kind {
            EntryKind::Bookmark(anchor) => Some(anchor),
            EntryKind::Group => None,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.anchor().map(|anchor| anchor.file_path.as_path())
    }

    /// True when this is a bookmark anchored in exactly `path`
    pub fn is_in_file(&self, path: &Path) -> bool {
        self.file_path() == Some(path)
    }
}

/// Groups show their label, bookmarks show `label | file.ext:line` with a 1-based line
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EntryKind::Group => write!(f, "{}", self.label),
            EntryKind::Bookmark(anchor) => {
                let file_name = anchor
                    .file_path
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .unwrap_or_else(|| anchor.file_path.to_string_lossy());
                write!(
                    f,
                    "{} | {}:{}",
                    self.label,
                    file_name,
                    anchor.line_number + 1
                )
            }
        }
    }
}
