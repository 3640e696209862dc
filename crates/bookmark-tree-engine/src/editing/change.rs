/// A position in a document, 0-based line and character column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One contiguous replacement as reported by the host editor.
///
/// `start` and `end` are in the coordinates of the document before the edit;
/// all changes of one event share that coordinate space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl TextChange {
    pub fn new(start: Position, end: Position, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Insert `text` at a position without replacing anything
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    /// Delete the range `start..end`
    pub fn delete(start: Position, end: Position) -> Self {
        Self::new(start, end, "")
    }
}

/// The line-level shape of a change: lines `start_line..=end_line` were
/// replaced by content spanning `inserted_line_count` line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOp {
    pub start_line: usize,
    /// Column where the edit starts on `start_line`
    pub start_column: usize,
    pub end_line: usize,
    pub inserted_line_count: usize,
}

impl EditOp {
    pub fn replaced_line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

impl From<&TextChange> for EditOp {
    fn from(change: &TextChange) -> Self {
        Self {
            start_line: change.start.line,
            start_column: change.start.column,
            end_line: change.end.line.max(change.start.line),
            inserted_line_count: change.text.matches('\n').count(),
        }
    }
}
