use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// One node in a document tree.
///
/// The wire shape is deliberately loose: `kind` is an open string and `attrs`
/// is a JSON map, so records written by other clients (or future versions)
/// survive a read-modify-write cycle without this client understanding them.
/// The root node of every snapshot has kind `doc`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct DocNode {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attrs: serde_json::Map<String, serde_json::Value>,

    /// Leaf text. Inline markup (bold/italic/code/link/color) stays inside
    /// the text and is interpreted at render time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<DocNode>,
}

pub(crate) const DOC_KIND: &str = "doc";
const TEXT_KIND: &str = "text";

impl DocNode {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attrs: serde_json::Map::new(),
            text: None,
            content: vec![],
        }
    }

    pub fn text_node(text: &str) -> Self {
        let mut n = Self::new(TEXT_KIND);
        n.text = Some(text.to_string());
        n
    }

    pub fn with_attr(mut self, key: &str, value: serde_json::Value) -> Self {
        self.attrs.insert(key.to_string(), value);
        self
    }

    pub fn with_text_child(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.content.push(Self::text_node(text));
        }
        self
    }

    /// Concatenated text of all direct text children.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        if let Some(t) = &self.text {
            out.push_str(t);
        }
        for c in &self.content {
            if c.kind == TEXT_KIND {
                if let Some(t) = &c.text {
                    out.push_str(t);
                }
            }
        }
        out
    }
}

/// A snapshot is acceptable for propagation only if it is rooted at `doc`.
///
/// The editing surface is trusted, so this should never fire; it exists so a
/// bad snapshot is dropped instead of poisoning the host copy and the shared
/// record.
pub(crate) fn is_valid_snapshot(tree: &DocNode) -> bool {
    tree.kind == DOC_KIND
}

/// Block kinds the editing surface understands. Display strings are the
/// labels shown in the node selector and the slash menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, AsRefStr)]
pub(crate) enum BlockKind {
    #[default]
    #[strum(to_string = "Text")]
    Paragraph,
    #[strum(to_string = "Heading 1")]
    Heading1,
    #[strum(to_string = "Heading 2")]
    Heading2,
    #[strum(to_string = "Heading 3")]
    Heading3,
    #[strum(to_string = "Bullet List")]
    BulletItem,
    #[strum(to_string = "Numbered List")]
    NumberedItem,
    #[strum(to_string = "Quote")]
    Quote,
    #[strum(to_string = "Code")]
    Code,
    #[strum(to_string = "To-do")]
    TaskItem,
}

pub(crate) const SELECTABLE_KINDS: [BlockKind; 9] = [
    BlockKind::Paragraph,
    BlockKind::Heading1,
    BlockKind::Heading2,
    BlockKind::Heading3,
    BlockKind::BulletItem,
    BlockKind::NumberedItem,
    BlockKind::Quote,
    BlockKind::Code,
    BlockKind::TaskItem,
];

impl BlockKind {
    /// Node kind string used in the serialized tree. Headings share one kind
    /// and carry their level as an attribute.
    pub fn wire_kind(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => "heading",
            BlockKind::BulletItem => "bullet_item",
            BlockKind::NumberedItem => "numbered_item",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
            BlockKind::TaskItem => "task_item",
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockKind::Heading1 => Some(1),
            BlockKind::Heading2 => Some(2),
            BlockKind::Heading3 => Some(3),
            _ => None,
        }
    }

    /// Inverse of `wire_kind` + attrs. Unknown kinds degrade to paragraphs so
    /// remote content from a newer client still renders as plain text.
    pub fn from_wire(kind: &str, attrs: &serde_json::Map<String, serde_json::Value>) -> Self {
        match kind {
            "heading" => match attrs.get("level").and_then(|v| v.as_u64()) {
                Some(2) => BlockKind::Heading2,
                Some(3) => BlockKind::Heading3,
                _ => BlockKind::Heading1,
            },
            "bullet_item" => BlockKind::BulletItem,
            "numbered_item" => BlockKind::NumberedItem,
            "quote" => BlockKind::Quote,
            "code" => BlockKind::Code,
            "task_item" => BlockKind::TaskItem,
            _ => BlockKind::Paragraph,
        }
    }
}

/// Surface-local editing model: one row per block. The id keys rendered rows
/// and focus tracking and is never serialized.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub text: String,
    /// Task items only.
    pub checked: bool,
}

impl Block {
    pub fn new(id: String, kind: BlockKind, text: &str) -> Self {
        Self {
            id,
            kind,
            text: text.to_string(),
            checked: false,
        }
    }
}

pub(crate) fn blocks_to_tree(blocks: &[Block]) -> DocNode {
    let mut doc = DocNode::new(DOC_KIND);
    for b in blocks {
        let mut node = DocNode::new(b.kind.wire_kind()).with_text_child(&b.text);
        if let Some(level) = b.kind.heading_level() {
            node = node.with_attr("level", serde_json::json!(level));
        }
        if b.kind == BlockKind::TaskItem {
            node = node.with_attr("checked", serde_json::json!(b.checked));
        }
        doc.content.push(node);
    }
    doc
}

/// Flatten a tree back into surface blocks, minting fresh row ids.
///
/// Always yields at least one (empty paragraph) block so the surface has a
/// row to focus.
pub(crate) fn tree_to_blocks(tree: &DocNode, mut mint: impl FnMut() -> String) -> Vec<Block> {
    let mut out: Vec<Block> = vec![];
    for node in &tree.content {
        let kind = BlockKind::from_wire(&node.kind, &node.attrs);
        let mut b = Block::new(mint(), kind, &node.plain_text());
        if kind == BlockKind::TaskItem {
            b.checked = node
                .attrs
                .get("checked")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
        }
        out.push(b);
    }

    if out.is_empty() {
        out.push(Block::new(mint(), BlockKind::Paragraph, ""));
    }
    out
}

/// Empty tree used to seed a live-state record that does not exist yet.
pub(crate) fn empty_document() -> DocNode {
    let mut doc = DocNode::new(DOC_KIND);
    doc.content.push(DocNode::new("paragraph"));
    doc
}

/// Canonical starter content for the "new document" action.
pub(crate) fn default_document() -> DocNode {
    let mut doc = DocNode::new(DOC_KIND);
    doc.content.push(
        DocNode::new("heading")
            .with_attr("level", serde_json::json!(1))
            .with_text_child("Untitled"),
    );
    doc.content.push(DocNode::new("paragraph"));
    doc
}

/// Source entry from the host dashboard's source API.
///
/// `credentials` is opaque backend data; kept as loose JSON so new backends
/// do not break the picker.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Source {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub credentials: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq_minter() -> impl FnMut() -> String {
        let mut n = 0u64;
        move || {
            n += 1;
            format!("blk-{n}")
        }
    }

    #[test]
    fn test_doc_node_wire_contract() {
        let tree = default_document();
        let v = serde_json::to_value(&tree).expect("should serialize");
        assert_eq!(v["type"], "doc");
        assert_eq!(v["content"][0]["type"], "heading");
        assert_eq!(v["content"][0]["attrs"]["level"], 1);
        assert_eq!(v["content"][0]["content"][0]["type"], "text");
        assert_eq!(v["content"][0]["content"][0]["text"], "Untitled");
        // Empty paragraph serializes without attrs/text/content keys.
        assert_eq!(v["content"][1], serde_json::json!({"type": "paragraph"}));
    }

    #[test]
    fn test_doc_node_roundtrip_preserves_unknown_attrs() {
        let json = r#"{
            "type": "doc",
            "content": [
                {"type": "callout", "attrs": {"tone": "warning"},
                 "content": [{"type": "text", "text": "careful"}]}
            ]
        }"#;
        let tree: DocNode = serde_json::from_str(json).expect("should parse");
        let back = serde_json::to_value(&tree).expect("should serialize");
        assert_eq!(back["content"][0]["attrs"]["tone"], "warning");
    }

    #[test]
    fn test_is_valid_snapshot_requires_doc_root() {
        assert!(is_valid_snapshot(&empty_document()));
        assert!(!is_valid_snapshot(&DocNode::new("paragraph")));
    }

    #[test]
    fn test_blocks_roundtrip_through_tree() {
        let blocks = vec![
            Block::new("a".into(), BlockKind::Heading2, "Title"),
            Block::new("b".into(), BlockKind::Paragraph, "Body **bold** text"),
            Block {
                id: "c".into(),
                kind: BlockKind::TaskItem,
                text: "ship it".into(),
                checked: true,
            },
        ];

        let tree = blocks_to_tree(&blocks);
        let back = tree_to_blocks(&tree, seq_minter());

        assert_eq!(back.len(), 3);
        assert_eq!(back[0].kind, BlockKind::Heading2);
        assert_eq!(back[0].text, "Title");
        assert_eq!(back[1].text, "Body **bold** text");
        assert_eq!(back[2].kind, BlockKind::TaskItem);
        assert!(back[2].checked);
    }

    #[test]
    fn test_unknown_block_kind_degrades_to_paragraph() {
        let mut tree = DocNode::new(DOC_KIND);
        tree.content
            .push(DocNode::new("mermaid_diagram").with_text_child("graph TD"));

        let blocks = tree_to_blocks(&tree, seq_minter());
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].text, "graph TD");
    }

    #[test]
    fn test_empty_tree_yields_one_empty_paragraph_block() {
        let blocks = tree_to_blocks(&DocNode::new(DOC_KIND), seq_minter());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert!(blocks[0].text.is_empty());
    }

    #[test]
    fn test_heading_levels_roundtrip() {
        for (kind, level) in [
            (BlockKind::Heading1, 1),
            (BlockKind::Heading2, 2),
            (BlockKind::Heading3, 3),
        ] {
            let tree = blocks_to_tree(&[Block::new("x".into(), kind, "h")]);
            assert_eq!(tree.content[0].attrs["level"], level);
            assert_eq!(
                BlockKind::from_wire("heading", &tree.content[0].attrs),
                kind
            );
        }
    }

    #[test]
    fn test_block_kind_labels() {
        assert_eq!(BlockKind::Paragraph.to_string(), "Text");
        assert_eq!(BlockKind::Heading1.to_string(), "Heading 1");
        assert_eq!(BlockKind::TaskItem.to_string(), "To-do");
    }

    #[test]
    fn test_source_contract_deserialize() {
        // Contract based on the dashboard backend: /api/fetch-sources
        let json = r#"{"id": 3, "name": "warehouse", "type": "postgres",
                       "credentials": {"host": "db.internal"}}"#;
        let s: Source = serde_json::from_str(json).expect("source should parse");
        assert_eq!(s.id, 3);
        assert_eq!(s.source_type, "postgres");
        assert_eq!(s.credentials["host"], "db.internal");
    }
}
