pub mod entry;
pub mod record;

pub use entry::{Anchor, Entry, EntryKind};
pub use record::{EntryRecord, RecordError};
