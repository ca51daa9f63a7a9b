use crate::models::DocNode;
use crate::storage::{load_json_from_storage, save_json_to_storage};
use serde::{Deserialize, Serialize};

fn key(session_key: &str) -> String {
    format!("inkstone_doc_snapshot::{session_key}")
}

/// Last snapshot accepted by the bridge for a session, mirrored locally.
///
/// Used as the initial content when the live-state channel cannot be reached
/// at mount, so a reload while offline does not drop back to the default
/// tree.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct DocSnapshot {
    pub saved_ms: i64,
    pub session_key: String,
    pub content: DocNode,
}

pub(crate) fn save_doc_snapshot(session_key: &str, content: &DocNode, saved_ms: i64) {
    if session_key.trim().is_empty() {
        return;
    }

    let snap = DocSnapshot {
        saved_ms,
        session_key: session_key.to_string(),
        content: content.clone(),
    };

    save_json_to_storage(&key(session_key), &snap);
}

pub(crate) fn load_doc_snapshot(session_key: &str) -> Option<DocSnapshot> {
    if session_key.trim().is_empty() {
        return None;
    }
    load_json_from_storage::<DocSnapshot>(&key(session_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keys_are_namespaced_per_session() {
        assert_eq!(key("doc-42"), "inkstone_doc_snapshot::doc-42");
        assert_ne!(key("doc-42"), key("doc-43"));
    }
}
