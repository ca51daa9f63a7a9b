use leptos::prelude::*;
use leptos_router::params::Params;

/// Scratch key used when the route carries no document id.
///
/// It is a reserved name (real document ids are minted as `doc-...`), so an
/// id-less editor can never alias an actual document's record.
pub(crate) const FALLBACK_SESSION_KEY: &str = "local-draft";

#[derive(Params, PartialEq, Clone, Debug)]
pub struct DocumentRouteParams {
    pub doc_id: Option<String>,
}

/// Derive the live-state session key from the route's document id.
///
/// Pure and deterministic; the bridge re-initializes whenever the resolved
/// key changes, which is treated the same as a remount.
pub(crate) fn resolve_session_key(doc_id: Option<&str>) -> String {
    match doc_id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => FALLBACK_SESSION_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_route_id() {
        assert_eq!(resolve_session_key(Some("doc-42")), "doc-42");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(resolve_session_key(Some("  doc-42 ")), "doc-42");
    }

    #[test]
    fn test_missing_or_blank_id_falls_back_to_scratch_key() {
        assert_eq!(resolve_session_key(None), FALLBACK_SESSION_KEY);
        assert_eq!(resolve_session_key(Some("")), FALLBACK_SESSION_KEY);
        assert_eq!(resolve_session_key(Some("   ")), FALLBACK_SESSION_KEY);
    }

    #[test]
    fn test_scratch_key_cannot_alias_minted_document_ids() {
        let minted = crate::util::make_document_id(1700000000000, 1);
        assert_ne!(resolve_session_key(None), minted);
    }
}
