use std::sync::atomic::{AtomicU64, Ordering};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

static ID_SEQ: AtomicU64 = AtomicU64::new(1);

/// Mint a surface-local block id.
///
/// Ids only need to be unique within one running editor instance (they key
/// `<For>` rows and focus tracking); they are never serialized into the tree.
pub(crate) fn make_block_id(now_ms: i64, seq: u64) -> String {
    format!("blk-{now_ms}-{seq}")
}

pub(crate) fn next_block_id() -> String {
    make_block_id(now_ms(), ID_SEQ.fetch_add(1, Ordering::SeqCst))
}

/// Mint a fresh document id for the "new document" route.
pub(crate) fn make_document_id(now_ms: i64, seq: u64) -> String {
    format!("doc-{now_ms}-{seq:04}")
}

pub(crate) fn next_document_id() -> String {
    make_document_id(now_ms(), ID_SEQ.fetch_add(1, Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_ids_embed_timestamp_and_sequence() {
        assert_eq!(make_block_id(1700000000000, 7), "blk-1700000000000-7");
    }

    #[test]
    fn test_document_ids_are_distinct_per_sequence() {
        let a = make_document_id(1700000000000, 1);
        let b = make_document_id(1700000000000, 2);
        assert_ne!(a, b);
        assert!(a.starts_with("doc-"));
    }
}
