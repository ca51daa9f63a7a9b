mod doc_sync;

pub(crate) use doc_sync::DocSyncBridge;

use crate::api::ApiClient;
use crate::live::LiveStateClient;
use crate::models::{default_document, DocNode, Source};
use crate::storage::{load_string_from_storage, SELECTED_SOURCE_KEY};
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub live_client: RwSignal<LiveStateClient>,

    /// Host page's own copy of the document tree. The sync bridge is the only
    /// writer; the page reads it for downstream use (word count, future
    /// persistence).
    pub document: RwSignal<DocNode>,

    /// Tree the host wants the next editor mount to start from (e.g. the
    /// starter content of a freshly created document). Consumed once by the
    /// bridge; takes precedence over the live-state record.
    pub pending_initial: RwSignal<Option<DocNode>>,

    /// Source picker (display/glue, independent of editing).
    pub sources: RwSignal<Vec<Source>>,
    pub sources_loading: RwSignal<bool>,
    pub sources_error: RwSignal<Option<String>>,

    /// Sources load guard (avoid duplicate loads + ignore stale responses).
    pub sources_request_id: RwSignal<u64>,

    /// Display label of the picked source, persisted across sessions.
    pub selected_source: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        let selected_source = load_string_from_storage(SELECTED_SOURCE_KEY);

        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            live_client: RwSignal::new(LiveStateClient::from_env()),
            document: RwSignal::new(default_document()),
            pending_initial: RwSignal::new(None),
            sources: RwSignal::new(vec![]),
            sources_loading: RwSignal::new(false),
            sources_error: RwSignal::new(None),
            sources_request_id: RwSignal::new(0),
            selected_source: RwSignal::new(selected_source),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
