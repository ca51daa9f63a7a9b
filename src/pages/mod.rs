use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Select, SelectContent, SelectOption,
    SelectTrigger, SelectValue, Spinner,
};
use crate::editor::DocumentSurface;
use crate::models::{default_document, Source};
use crate::session::{resolve_session_key, DocumentRouteParams};
use crate::state::{AppContext, DocSyncBridge};
use crate::storage::{remove_from_storage, save_string_to_storage, SELECTED_SOURCE_KEY};
use crate::util::next_document_id;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};

pub(crate) fn source_label(s: &Source) -> String {
    if s.name.trim().is_empty() {
        s.source_type.clone()
    } else {
        s.name.clone()
    }
}

/// Root route: mint a fresh document id and open its editor with the starter
/// content. The starter tree is handed over as the explicit initial value, so
/// it wins over whatever the channel may hold for the new key.
#[component]
pub fn RootPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    Effect::new(move |_| {
        let id = next_document_id();
        app_state.0.pending_initial.set(Some(default_document()));
        navigate.get_value()(&format!("/document/{id}"), Default::default());
    });

    view! {
        <div class="px-4 py-8 text-xs text-muted-foreground">"Creating a new document..."</div>
    }
}

#[component]
pub fn DocumentPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let bridge = expect_context::<DocSyncBridge>();
    let params = use_params::<DocumentRouteParams>();

    // Use closures so params access happens inside a reactive tracking context.
    let doc_id = move || params.get().ok().and_then(|p| p.doc_id).unwrap_or_default();

    // Bind the bridge to the route's session key; re-runs on navigation and
    // re-initializes the channel record for the new key.
    let bridge_session = bridge.clone();
    Effect::new(move |_| {
        let id = doc_id();
        let key = resolve_session_key(Some(id.as_str()));

        let explicit = app_state.0.pending_initial.get_untracked();
        if explicit.is_some() {
            app_state.0.pending_initial.set(None);
        }

        bridge_session.set_session(key, explicit);
    });

    // Source list for the picker. Failures surface as an empty list plus an
    // inline notice; they never touch editing.
    Effect::new(move |_| {
        let req_id = app_state
            .0
            .sources_request_id
            .get_untracked()
            .saturating_add(1);
        app_state.0.sources_request_id.set(req_id);

        app_state.0.sources_loading.set(true);
        app_state.0.sources_error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.get_source_list().await;

            // Ignore stale responses.
            if app_state.0.sources_request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(sources) => app_state.0.sources.set(sources),
                Err(e) => {
                    app_state.0.sources.set(vec![]);
                    app_state.0.sources_error.set(Some(e.to_string()));
                }
            }
            app_state.0.sources_loading.set(false);
        });
    });

    let on_source_change = Callback::new(move |val: Option<String>| {
        app_state.0.selected_source.set(val.clone());
        match val {
            Some(v) => save_string_to_storage(SELECTED_SOURCE_KEY, &v),
            None => remove_from_storage(SELECTED_SOURCE_KEY),
        }
    });

    let channel_online = bridge.online_signal();
    let epoch = bridge.epoch_signal();
    let initial_content = bridge.initial_content_signal();

    let bridge_reset = bridge.clone();
    let bridge_update = bridge.clone();

    let sources = app_state.0.sources;
    let sources_loading = app_state.0.sources_loading;
    let selected_source = app_state.0.selected_source;

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[860px] px-4 py-6">
                <div class="mb-4 flex items-center justify-between gap-2">
                    <nav class="flex items-center gap-1.5 text-sm text-muted-foreground">
                        <a class="hover:text-foreground" href="/home">"Home"</a>
                        <span class="select-none">"/"</span>
                        <a class="hover:text-foreground" href="/documents">"Documents"</a>
                        <span class="select-none">"/"</span>
                        <span class="text-foreground">"Current document"</span>
                    </nav>

                    <div class="flex items-center gap-2">
                        <Select
                            default_value=selected_source.get_untracked()
                            on_change=on_source_change
                        >
                            <SelectTrigger class="w-[200px]">
                                <SelectValue placeholder="Select a source" />
                            </SelectTrigger>
                            <SelectContent>
                                <Show
                                    when=move || !sources.get().is_empty()
                                    fallback=move || view! {
                                        <li class="px-2 py-1.5 text-sm text-muted-foreground">
                                            {move || if sources_loading.get() {
                                                "Loading..."
                                            } else {
                                                "No sources yet"
                                            }}
                                        </li>
                                    }
                                >
                                    {move || {
                                        sources
                                            .get()
                                            .iter()
                                            .map(|s| {
                                                let label = source_label(s);
                                                view! {
                                                    <SelectOption value=label.clone()>
                                                        {label.clone()}
                                                    </SelectOption>
                                                }
                                            })
                                            .collect_view()
                                    }}
                                </Show>
                            </SelectContent>
                        </Select>

                        <Button
                            size=ButtonSize::Default
                            on:click=move |_| bridge_reset.reset_document()
                        >
                            "New Document"
                        </Button>
                    </div>
                </div>

                <Show when=move || app_state.0.sources_error.get().is_some() fallback=|| ().into_view()>
                    {move || {
                        app_state.0.sources_error.get().map(|e| view! {
                            <Alert class="mb-3 border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">
                                    {format!("Sources unavailable: {e}")}
                                </AlertDescription>
                            </Alert>
                        })
                    }}
                </Show>

                <Show when=move || !channel_online.get() fallback=|| ().into_view()>
                    <Alert class="mb-3">
                        <AlertDescription class="text-xs text-muted-foreground">
                            <span class="inline-flex items-center gap-2">
                                <Spinner class="size-3" />
                                "Live sync unavailable. Edits stay on this device until the connection recovers."
                            </span>
                        </AlertDescription>
                    </Alert>
                </Show>

                // The surface is remounted whenever the bridge re-initializes
                // (session change or new-document reset): epoch keys the
                // closure, so a bump rebuilds the editor from initial_content.
                {move || {
                    let _epoch = epoch.get();
                    let initial = initial_content.get_untracked();
                    let b = bridge_update.clone();
                    view! {
                        <DocumentSurface
                            initial_content=initial
                            on_update=Callback::new(move |tree| b.on_editor_update(tree))
                        />
                    }
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label_prefers_name_then_type() {
        let named: Source = serde_json::from_str(
            r#"{"id": 1, "name": "events", "type": "clickhouse"}"#,
        )
        .expect("should parse");
        assert_eq!(source_label(&named), "events");

        let unnamed: Source =
            serde_json::from_str(r#"{"id": 2, "name": "  ", "type": "bigquery"}"#)
                .expect("should parse");
        assert_eq!(source_label(&unnamed), "bigquery");
    }
}
