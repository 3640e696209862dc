use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::{Anchor, Entry, EntryKind};

/// The persisted shape of an entry.
///
/// There is no kind tag: a record without `filePath`, `lineNumber` and `text`
/// is a group. Older saves wrote groups with `lineNumber: -1`, and could write
/// a bookmark on the first line as `-1` too, so negative line numbers are
/// accepted on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("Record has no label")]
    MissingLabel,
    #[error("Record <{0}> has only part of a file anchor")]
    PartialAnchor(String),
}

impl TryFrom<EntryRecord> for Entry {
    type Error = RecordError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let label = match record.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => return Err(RecordError::MissingLabel),
        };

        let line_number = record.line_number.filter(|line| *line >= 0);
        let kind = match (record.file_path, record.text) {
            (None, None) if line_number.is_none() => EntryKind::Group,
            (Some(file_path), Some(text)) => EntryKind::Bookmark(Anchor {
                file_path: PathBuf::from(file_path),
                line_number: line_number.unwrap_or(0) as usize,
                text,
            }),
            _ => return Err(RecordError::PartialAnchor(label)),
        };

        Ok(Entry {
            label,
            group: record.group,
            is_expanded: record.is_expanded.unwrap_or(false),
            kind,
            records_expanded: record.is_expanded.is_some(),
            extra: record.extra,
        })
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        let mut record = EntryRecord {
            label: Some(entry.label.clone()),
            group: entry.group.clone(),
            is_expanded: (entry.records_expanded || entry.is_expanded)
                .then_some(entry.is_expanded),
            extra: entry.extra.clone(),
            ..Default::default()
        };
        if let EntryKind::Bookmark(anchor) = &entry.kind {
            record.file_path = Some(anchor.file_path.to_string_lossy().into_owned());
            record.line_number = Some(anchor.line_number as i64);
            record.text = Some(anchor.text.clone());
        }
        record
    }
}
