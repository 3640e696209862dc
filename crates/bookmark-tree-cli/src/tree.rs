use bookmark_tree_engine::{EntryKind, EntryStore};

/// One line per visible entry, indented by depth.
///
/// Groups are marked `-` when expanded and `+` when collapsed; bookmarks
/// show their cached line text after the location.
pub fn render(store: &EntryStore) -> Vec<String> {
    store
        .flatten()
        .into_iter()
        .map(|(entry, depth)| {
            let indent = "  ".repeat(depth);
            match &entry.kind {
                EntryKind::Group => {
                    let marker = if entry.is_expanded { '-' } else { '+' };
                    format!("{indent}{marker} {entry}")
                }
                EntryKind::Bookmark(anchor) => format!("{indent}  {entry}  {}", anchor.text),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmark_tree_engine::{Anchor, Entry};
    use pretty_assertions::assert_eq;

    fn store() -> EntryStore {
        [
            Entry::group("work").expanded(true),
            Entry::bookmark("main", Anchor::new("/p/src/main.rs", 0, "fn main() {")).in_group("work"),
            Entry::group("later").in_group("work"),
            Entry::bookmark("hidden", Anchor::new("/p/lib.rs", 4, "mod x;")).in_group("later"),
            Entry::bookmark("notes", Anchor::new("/p/NOTES.md", 9, "# Notes")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_indents_and_hides_collapsed_groups() {
        assert_eq!(
            render(&store()),
            vec![
                "- work",
                "    main | main.rs:1  fn main() {",
                "  + later",
                "  notes | NOTES.md:10  # Notes",
            ]
        );
    }

    #[test]
    fn test_render_empty_store() {
        assert!(render(&EntryStore::new()).is_empty());
    }
}
