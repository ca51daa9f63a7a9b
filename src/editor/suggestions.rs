use crate::models::{Block, BlockKind};

/// One slash-command catalog entry. Selecting it rewrites the invocation
/// block: the trigger text is removed and the block takes this entry's kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SuggestionEntry {
    pub title: &'static str,
    pub description: &'static str,
    /// Short glyph shown in the menu tile.
    pub icon: &'static str,
    pub kind: BlockKind,
}

/// The catalog is fixed at compile time; order is the display order.
const CATALOG: [SuggestionEntry; 9] = [
    SuggestionEntry {
        title: "Text",
        description: "Just start typing with plain text.",
        icon: "T",
        kind: BlockKind::Paragraph,
    },
    SuggestionEntry {
        title: "Heading 1",
        description: "Big section heading.",
        icon: "H1",
        kind: BlockKind::Heading1,
    },
    SuggestionEntry {
        title: "Heading 2",
        description: "Medium section heading.",
        icon: "H2",
        kind: BlockKind::Heading2,
    },
    SuggestionEntry {
        title: "Heading 3",
        description: "Small section heading.",
        icon: "H3",
        kind: BlockKind::Heading3,
    },
    SuggestionEntry {
        title: "Bullet List",
        description: "Create a simple bullet list.",
        icon: "•",
        kind: BlockKind::BulletItem,
    },
    SuggestionEntry {
        title: "Numbered List",
        description: "Create a list with numbering.",
        icon: "1.",
        kind: BlockKind::NumberedItem,
    },
    SuggestionEntry {
        title: "Quote",
        description: "Capture a quote.",
        icon: "\u{201C}",
        kind: BlockKind::Quote,
    },
    SuggestionEntry {
        title: "Code",
        description: "Capture a code snippet.",
        icon: "</>",
        kind: BlockKind::Code,
    },
    SuggestionEntry {
        title: "To-do",
        description: "Track a task with a checkbox.",
        icon: "\u{2611}",
        kind: BlockKind::TaskItem,
    },
];

pub(crate) fn suggestion_items() -> &'static [SuggestionEntry] {
    &CATALOG
}

/// Extract the slash-menu query from an editing buffer.
///
/// The trigger only fires at the start of a block (Notion-style): a buffer
/// like `/head` yields `head`; anything else means no menu.
pub(crate) fn slash_query(buffer: &str) -> Option<String> {
    buffer.strip_prefix('/').map(|q| q.to_string())
}

/// Case-insensitive substring match on the entry title. Empty query keeps the
/// whole catalog in order.
pub(crate) fn filter_suggestions(query: &str) -> Vec<SuggestionEntry> {
    let q = query.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|item| q.is_empty() || item.title.to_lowercase().contains(&q))
        .copied()
        .collect()
}

impl SuggestionEntry {
    /// Apply this command to the invocation block: drop the `/query` trigger
    /// text and convert the block to the entry's kind.
    pub fn apply(&self, block: &mut Block) {
        block.kind = self.kind;
        if slash_query(&block.text).is_some() {
            block.text.clear();
        }
        if self.kind != BlockKind::TaskItem {
            block.checked = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_ordered_and_titles_unique() {
        let items = suggestion_items();
        assert_eq!(items[0].title, "Text");
        assert_eq!(items[1].title, "Heading 1");
        assert_eq!(items.last().map(|i| i.title), Some("To-do"));

        let mut titles: Vec<_> = items.iter().map(|i| i.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), items.len());
    }

    #[test]
    fn test_catalog_is_stable_across_calls() {
        assert_eq!(suggestion_items(), suggestion_items());
    }

    #[test]
    fn test_slash_query() {
        assert_eq!(slash_query("/head"), Some("head".to_string()));
        assert_eq!(slash_query("/"), Some(String::new()));
        assert_eq!(slash_query("no trigger"), None);
        assert_eq!(slash_query(" /late"), None);
    }

    #[test]
    fn test_filter_is_substring_case_insensitive() {
        let hits = filter_suggestions("head");
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|i| i.title.starts_with("Heading")));

        let hits = filter_suggestions("LIST");
        assert_eq!(hits.len(), 2);

        assert_eq!(filter_suggestions("").len(), suggestion_items().len());
        assert!(filter_suggestions("zzz").is_empty());
    }

    #[test]
    fn test_apply_replaces_trigger_text_and_converts_kind() {
        let mut block = Block::new("b1".into(), BlockKind::Paragraph, "/head");
        let entry = filter_suggestions("heading 2")[0];

        entry.apply(&mut block);

        assert_eq!(block.kind, BlockKind::Heading2);
        assert!(block.text.is_empty());
    }

    #[test]
    fn test_apply_without_trigger_keeps_text() {
        // Node-selector path reuses the same commands on already-typed text.
        let mut block = Block::new("b1".into(), BlockKind::Paragraph, "existing words");
        let entry = filter_suggestions("quote")[0];

        entry.apply(&mut block);

        assert_eq!(block.kind, BlockKind::Quote);
        assert_eq!(block.text, "existing words");
    }

    #[test]
    fn test_apply_task_resets_checked_on_kind_change() {
        let mut block = Block {
            id: "b1".into(),
            kind: BlockKind::TaskItem,
            text: "done thing".into(),
            checked: true,
        };
        let entry = filter_suggestions("text")[0];

        entry.apply(&mut block);

        assert_eq!(block.kind, BlockKind::Paragraph);
        assert!(!block.checked);
    }
}
