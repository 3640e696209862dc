//! Keeping bookmarks on the right line while their document is edited.
//!
//! The host reports each document change as a batch of replacements, all in
//! the coordinates of the document before the change. Every bookmark in the
//! edited file is run through the batch in order:
//!
//! - a replacement that keeps the line count only refreshes the cached text
//!   of bookmarks inside it;
//! - a net insertion pushes bookmarks at or below the edit down;
//! - a net deletion removes bookmarks whose line was deleted outright and
//!   pulls the ones below it up.
//!
//! Whether the first line of an edit counts as "inside" depends on whether
//! there is text before the edit column on that line. Typing in the middle of
//! a bookmarked line should not move or delete that bookmark. This is a
//! heuristic over line-level edits, not a diff.

use std::collections::HashSet;
use std::path::Path;

use super::change::EditOp;
use super::document::LineSource;
use crate::store::EntryStore;

/// What a reanchoring pass did, by bookmark label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReanchorReport {
    /// Bookmarks whose line number changed
    pub moved: Vec<String>,
    /// Bookmarks whose cached text was re-read from the document
    pub refreshed: Vec<String>,
    /// Bookmarks deleted because their line was deleted
    pub removed: Vec<String>,
}

impl ReanchorReport {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.refreshed.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep { line: usize, refresh: bool },
    Remove,
}

/// Per-operation facts that do not depend on the bookmark being moved
#[derive(Debug, Clone, Copy)]
struct OpContext {
    op: EditOp,
    /// Only whitespace precedes the edit on its first line
    prefix_blank: bool,
    /// Some bookmark in this file sits on the edit's first line
    start_line_bookmarked: bool,
}

impl OpContext {
    fn step(&self, line: usize) -> Step {
        let op = &self.op;
        let start = op.start_line;
        let inserted = op.inserted_line_count;
        let replaced = op.replaced_line_count();
        let touched = |line: usize| (start..=start + inserted).contains(&line);

        if inserted == replaced {
            return Step::Keep {
                line,
                refresh: (start..=op.end_line).contains(&line),
            };
        }

        if inserted > replaced {
            let shift = inserted - replaced;
            let shift_from = if self.prefix_blank { start } else { start + 1 };
            let line = if line >= shift_from { line + shift } else { line };
            return Step::Keep {
                line,
                refresh: touched(line),
            };
        }

        if line < start {
            return Step::Keep {
                line,
                refresh: false,
            };
        }
        let shift = replaced - inserted;
        // With text before the edit, the first line survives unless nothing is anchored there
        let deletable = self.prefix_blank || !self.start_line_bookmarked;
        let delete_from = if deletable { start } else { start + 1 };
        let shift_from = delete_from + shift;

        if (delete_from..shift_from).contains(&line) {
            return Step::Remove;
        }
        let line = if line >= shift_from { line - shift } else { line };
        Step::Keep {
            line,
            refresh: touched(line),
        }
    }
}

/// Apply one document change to every bookmark anchored in `file_path`.
///
/// `doc` is the document after the change; it supplies the text before each
/// edit's start column and the refreshed snippets. Bookmarks whose line was
/// deleted are removed from the store.
pub fn reanchor<D: LineSource + ?Sized>(
    store: &mut EntryStore,
    file_path: &Path,
    ops: &[EditOp],
    doc: &D,
) -> ReanchorReport {
    let mut report = ReanchorReport::default();
    if ops.is_empty() {
        return report;
    }

    let affected: Vec<(String, usize)> = store
        .bookmarks()
        .filter(|entry| entry.is_in_file(file_path))
        .filter_map(|entry| Some((entry.label.clone(), entry.anchor()?.line_number)))
        .collect();
    if affected.is_empty() {
        return report;
    }

    let bookmarked_lines: HashSet<usize> = affected.iter().map(|(_, line)| *line).collect();
    let contexts: Vec<OpContext> = ops
        .iter()
        .map(|op| OpContext {
            op: *op,
            prefix_blank: doc.prefix_is_blank(op.start_line, op.start_column),
            start_line_bookmarked: bookmarked_lines.contains(&op.start_line),
        })
        .collect();

    for (label, original_line) in affected {
        let mut line = original_line;
        let mut refresh = false;
        let mut removed = false;

        for context in &contexts {
            match context.step(line) {
                Step::Keep {
                    line: next,
                    refresh: touched,
                } => {
                    line = next;
                    refresh |= touched;
                }
                Step::Remove => {
                    removed = true;
                    break;
                }
            }
        }

        if removed {
            log::info!(
                "Removing bookmark <{label}>: line {} of {} was deleted",
                original_line + 1,
                file_path.display()
            );
            store.remove(&label);
            report.removed.push(label);
            continue;
        }

        let Some(anchor) = store.by_label_mut(&label).and_then(|entry| entry.anchor_mut()) else {
            continue;
        };
        if line != original_line {
            log::debug!("Bookmark <{label}> moved from line {original_line} to {line}");
            anchor.line_number = line;
            report.moved.push(label.clone());
        }
        if refresh {
            match doc.snippet(line) {
                Some(text) => {
                    anchor.text = text;
                    report.refreshed.push(label);
                }
                None => log::debug!("Bookmark <{label}> is past the end of the document"),
            }
        }
    }

    if !report.is_empty() {
        log::info!(
            "Reanchored {}: {} moved, {} refreshed, {} removed",
            file_path.display(),
            report.moved.len(),
            report.refreshed.len(),
            report.removed.len()
        );
    }
    report
}
