use crate::models::{Anchor, Entry};
use crate::store::EntryStore;

/// A bookmark whose cached text names its line
pub fn bookmark(label: &str, file_path: &str, line_number: usize) -> Entry {
    Entry::bookmark(
        label,
        Anchor::new(file_path, line_number, format!("line {line_number}")),
    )
}

/// Labels in store order
pub fn labels(store: &EntryStore) -> Vec<&str> {
    store.iter().map(|entry| entry.label.as_str()).collect()
}

/// ```text
/// intro
/// compiler/        (expanded)
///   parse
///   frontend/      (expanded)
///     lex
/// readme
/// ```
pub fn nested_store() -> EntryStore {
    [
        bookmark("intro", "/proj/README.md", 0),
        Entry::group("compiler").expanded(true),
        bookmark("parse", "/proj/src/parser.rs", 10).in_group("compiler"),
        Entry::group("frontend").in_group("compiler").expanded(true),
        bookmark("lex", "/proj/src/lexer.rs", 4).in_group("frontend"),
        bookmark("readme", "/proj/README.md", 20),
    ]
    .into_iter()
    .collect()
}

/// A document with `count` lines reading `line 0`, `line 1`, ...
pub fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|line| format!("line {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
