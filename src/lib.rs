mod api;
mod app;
mod cache;
mod components;
mod editor;
mod live;
mod models;
mod pages;
mod session;
mod state;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::cache::{load_doc_snapshot, save_doc_snapshot};
    use crate::models::{default_document, empty_document};
    use crate::storage::{
        load_string_from_storage, remove_from_storage, save_string_to_storage,
        SELECTED_SOURCE_KEY,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_doc_snapshot_roundtrip() {
        save_doc_snapshot("doc-wasm-1", &default_document(), 1234);

        let snap = load_doc_snapshot("doc-wasm-1").expect("snapshot should load");
        assert_eq!(snap.saved_ms, 1234);
        assert_eq!(snap.session_key, "doc-wasm-1");
        assert_eq!(snap.content, default_document());
    }

    #[wasm_bindgen_test]
    fn test_doc_snapshots_are_isolated_per_session_key() {
        save_doc_snapshot("doc-wasm-a", &default_document(), 1);
        save_doc_snapshot("doc-wasm-b", &empty_document(), 2);

        // Writing under one key must not alter the other key's snapshot.
        let a = load_doc_snapshot("doc-wasm-a").expect("a should load");
        let b = load_doc_snapshot("doc-wasm-b").expect("b should load");
        assert_eq!(a.content, default_document());
        assert_eq!(b.content, empty_document());
    }

    #[wasm_bindgen_test]
    fn test_blank_session_key_is_never_persisted() {
        save_doc_snapshot("", &default_document(), 1);
        assert!(load_doc_snapshot("").is_none());
    }

    #[wasm_bindgen_test]
    fn test_selected_source_storage_roundtrip() {
        remove_from_storage(SELECTED_SOURCE_KEY);
        assert!(load_string_from_storage(SELECTED_SOURCE_KEY).is_none());

        save_string_to_storage(SELECTED_SOURCE_KEY, "events");
        assert_eq!(
            load_string_from_storage(SELECTED_SOURCE_KEY).as_deref(),
            Some("events")
        );

        remove_from_storage(SELECTED_SOURCE_KEY);
        assert!(load_string_from_storage(SELECTED_SOURCE_KEY).is_none());
    }
}
