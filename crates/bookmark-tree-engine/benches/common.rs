// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use bookmark_tree_engine::{Anchor, Entry, EntryStore};

#[allow(dead_code)]
pub const FILE: &str = "/bench/src/main.rs";

/// A document of `lines` short lines
#[allow(dead_code)]
pub fn generate_source(lines: usize) -> String {
    (0..lines)
        .map(|line| format!("    let value_{line} = compute({line});"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One bookmark every `spacing` lines of [`FILE`], plus the same number in another file
#[allow(dead_code)]
pub fn generate_bookmarks(count: usize, spacing: usize) -> EntryStore {
    let mut store = EntryStore::new();
    for index in 0..count {
        let line = index * spacing;
        store.add(Entry::bookmark(
            format!("main-{index}"),
            Anchor::new(FILE, line, format!("let value_{line} = compute({line});")),
        ));
        store.add(Entry::bookmark(
            format!("other-{index}"),
            Anchor::new("/bench/src/other.rs", line, "other"),
        ));
    }
    store
}

/// `groups` groups nested `depth` deep, each holding `per_group` bookmarks
#[allow(dead_code)]
pub fn generate_hierarchy(groups: usize, depth: usize, per_group: usize) -> EntryStore {
    let mut store = EntryStore::new();
    for root in 0..groups {
        let mut parent: Option<String> = None;
        for level in 0..depth {
            let label = format!("group-{root}-{level}");
            let mut group = Entry::group(label.as_str()).expanded(true);
            if let Some(parent) = &parent {
                group = group.in_group(parent.as_str());
            }
            store.add(group);
            for item in 0..per_group {
                store.add(
                    Entry::bookmark(
                        format!("bookmark-{root}-{level}-{item}"),
                        Anchor::new(FILE, item, "bench"),
                    )
                    .in_group(label.as_str()),
                );
            }
            parent = Some(label);
        }
    }
    store
}
