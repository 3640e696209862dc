pub mod editing;
pub mod file_events;
pub mod hierarchy;
pub mod io;
pub mod models;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{EditOp, LineSource, Position, ReanchorReport, TextChange, reanchor, reanchor_changes};
pub use file_events::{FileRename, apply_deletions, apply_renames};
pub use io::{IoError, JsonFileStore, MemoryStore, Persistence, read_records, write_records};
pub use models::{Anchor, Entry, EntryKind, EntryRecord, RecordError};
pub use session::{BookmarkSession, SessionError};
pub use store::{EntryStore, StoreError};
