use crate::models::EntryRecord;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid bookmarks file {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where the ordered entry records are kept between sessions
pub trait Persistence {
    fn load(&self) -> Result<Vec<EntryRecord>, IoError>;
    fn save(&mut self, records: &[EntryRecord]) -> Result<(), IoError>;
}

/// Read entry records from a JSON array file.
///
/// A missing file holds no records. Array elements that are not valid records
/// are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<EntryRecord>, IoError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| IoError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    let records = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Skipping record {index} in {}: {err}", path.display());
                None
            }
        })
        .collect();
    Ok(records)
}

/// Write entry records as a pretty-printed JSON array, creating parent directories
pub fn write_records(path: &Path, records: &[EntryRecord]) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(records).map_err(|source| IoError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Records kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> Result<Vec<EntryRecord>, IoError> {
        read_records(&self.path)
    }

    fn save(&mut self, records: &[EntryRecord]) -> Result<(), IoError> {
        write_records(&self.path, records)
    }
}

/// Records kept in memory, counting saves
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub records: Vec<EntryRecord>,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new(records: Vec<EntryRecord>) -> Self {
        Self { records, saves: 0 }
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<Vec<EntryRecord>, IoError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[EntryRecord]) -> Result<(), IoError> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}
