use crate::cache::{load_doc_snapshot, save_doc_snapshot};
use crate::live::{LiveError, LiveStateClient, LiveStateRecord};
use crate::models::{default_document, empty_document, is_valid_snapshot, DocNode};
use crate::state::AppContext;
use crate::util::now_ms;
use leptos::ev;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;

/// Single point reconciling the three copies of a document's content: the
/// editing surface, the host page's `document` signal, and the shared
/// live-state record for the current session key.
///
/// Responsibilities:
/// - ensure/read the live-state record on (re)initialization
/// - pick the initial render content (explicit > record > cached > default)
/// - propagate every accepted snapshot to the host synchronously, then issue
///   a fire-and-forget channel write
/// - degrade to local-only editing when the channel is unreachable
///
/// Non-responsibilities:
/// - surface UI state (editing row, menus, selection)
/// - replication/merge semantics between peers (channel service's job)
#[derive(Clone)]
pub(crate) struct DocSyncBridge {
    app_state: AppContext,

    /// Key the current writes are issued under. Changing it re-runs the
    /// initialization protocol, equivalent to a remount.
    session_key: RwSignal<String>,

    /// Bumped on every `set_session`; in-flight initializations from an older
    /// key compare against it and drop their result.
    init_generation: RwSignal<u64>,

    /// Connectivity to the live-state channel. Editing never blocks on this;
    /// it only drives the degraded-sync notice.
    channel_online: RwSignal<bool>,
    last_channel_error: RwSignal<Option<String>>,

    /// Content the surface should render from, replaced on (re)initialization
    /// and on a new-document reset. `epoch` keys the surface so it remounts
    /// whenever this is replaced.
    initial_content: RwSignal<DocNode>,
    epoch: RwSignal<u64>,
}

/// Initial-content precedence for one bridge initialization.
///
/// An explicit host-supplied tree always wins; otherwise the live-state
/// record; otherwise (channel unreachable) the locally cached last-known
/// snapshot; otherwise the empty document.
pub(crate) fn pick_initial_content(
    explicit: Option<DocNode>,
    record: Option<DocNode>,
    cached: Option<DocNode>,
) -> DocNode {
    explicit
        .or(record)
        .or(cached)
        .unwrap_or_else(empty_document)
}

impl DocSyncBridge {
    pub fn new(app_state: AppContext) -> Self {
        let s = Self {
            app_state,
            session_key: RwSignal::new(String::new()),
            init_generation: RwSignal::new(0),
            channel_online: RwSignal::new(true),
            last_channel_error: RwSignal::new(None),
            initial_content: RwSignal::new(empty_document()),
            epoch: RwSignal::new(0),
        };

        s.start_global_listeners();
        s
    }

    fn live_client(&self) -> LiveStateClient {
        self.app_state.0.live_client.get_untracked()
    }

    pub fn online_signal(&self) -> RwSignal<bool> {
        self.channel_online
    }

    pub fn epoch_signal(&self) -> RwSignal<u64> {
        self.epoch
    }

    pub fn initial_content_signal(&self) -> RwSignal<DocNode> {
        self.initial_content
    }

    #[allow(dead_code)]
    pub fn last_channel_error(&self) -> Option<String> {
        self.last_channel_error.get_untracked()
    }

    fn mark_channel_online(&self) {
        self.channel_online.set(true);
        self.last_channel_error.set(None);
    }

    fn mark_channel_offline(&self, e: &LiveError) {
        // Any failed channel call counts as degraded until a later call
        // succeeds; each edit is itself the next probe (no retry timer).
        warn!("live-state channel error: {e}");
        self.channel_online.set(false);
        self.last_channel_error.set(Some(e.to_string()));
    }

    /// Bind the bridge to a session key and run the initialization protocol:
    /// ensure-or-create the record, then pick the initial render content.
    ///
    /// Called from a tracked effect; a repeated call with the unchanged key
    /// is a no-op.
    pub fn set_session(&self, key: String, explicit_initial: Option<DocNode>) {
        if key.trim().is_empty() || self.session_key.get_untracked() == key {
            return;
        }

        self.session_key.set(key.clone());
        let generation = self.init_generation.get_untracked().saturating_add(1);
        self.init_generation.set(generation);

        let live = self.live_client();
        let s2 = self.clone();
        spawn_local(async move {
            let ensured = live
                .ensure(
                    &key,
                    LiveStateRecord {
                        content: empty_document(),
                    },
                )
                .await;

            // The route moved on while we were in flight; this result belongs
            // to the old key.
            if s2.init_generation.get_untracked() != generation {
                return;
            }

            let initial = match ensured {
                Ok(record) => {
                    s2.mark_channel_online();
                    pick_initial_content(explicit_initial, Some(record.content), None)
                }
                Err(e) => {
                    s2.mark_channel_offline(&e);
                    let cached = load_doc_snapshot(&key).map(|snap| snap.content);
                    pick_initial_content(explicit_initial, None, cached)
                }
            };

            s2.app_state.0.document.set(initial.clone());
            s2.initial_content.set(initial);
            s2.epoch.set(s2.epoch.get_untracked().saturating_add(1));
        });
    }

    /// Accept a whole-tree snapshot from the editing surface.
    ///
    /// Host state and the local snapshot mirror are updated in the same task;
    /// only the channel write is asynchronous, and nothing waits on it.
    pub fn on_editor_update(&self, tree: DocNode) {
        if !is_valid_snapshot(&tree) {
            warn!(
                "dropping malformed editor snapshot (root kind {:?})",
                tree.kind
            );
            return;
        }

        let key = self.session_key.get_untracked();
        if key.trim().is_empty() {
            return;
        }

        self.app_state.0.document.set(tree.clone());
        save_doc_snapshot(&key, &tree, now_ms());

        let live = self.live_client();
        let s2 = self.clone();
        spawn_local(async move {
            match live.write(&key, &LiveStateRecord { content: tree }).await {
                Ok(()) => s2.mark_channel_online(),
                Err(e) => s2.mark_channel_offline(&e),
            }
        });
    }

    /// "New document": replace the visible content with the canonical default
    /// tree, overwriting host state and the live-state record through the
    /// normal update protocol. In-progress edits are discarded.
    pub fn reset_document(&self) {
        let tree = default_document();
        self.initial_content.set(tree.clone());
        self.epoch.set(self.epoch.get_untracked().saturating_add(1));
        self.on_editor_update(tree);
    }

    fn start_global_listeners(&self) {
        // pagehide -> best-effort re-send of the last accepted snapshot, so a
        // tab close right after an edit still reaches the channel.
        let s2 = self.clone();
        let pagehide =
            window_event_listener(ev::pagehide, move |_ev: web_sys::PageTransitionEvent| {
                s2.pagehide_flush();
            });

        // The bridge is constructed once at app mount and lives for the app
        // lifetime; the listener stays registered with it.
        std::mem::forget(pagehide);
    }

    fn pagehide_flush(&self) {
        // When the channel is already down, flushing would just spam failures.
        if !self.channel_online.get_untracked() {
            return;
        }

        let key = self.session_key.get_untracked();
        if key.trim().is_empty() {
            return;
        }

        let tree = self.app_state.0.document.get_untracked();
        let live = self.live_client();
        spawn_local(async move {
            let _ = live.write(&key, &LiveStateRecord { content: tree }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_initial_beats_existing_record() {
        let explicit = default_document();
        let record = empty_document();

        let picked = pick_initial_content(Some(explicit.clone()), Some(record), None);
        assert_eq!(picked, explicit);
    }

    #[test]
    fn test_record_content_used_when_no_explicit_initial() {
        let record = default_document();
        let picked = pick_initial_content(None, Some(record.clone()), None);
        assert_eq!(picked, record);
    }

    #[test]
    fn test_cached_snapshot_used_when_channel_down() {
        let cached = default_document();
        let picked = pick_initial_content(None, None, Some(cached.clone()));
        assert_eq!(picked, cached);
    }

    #[test]
    fn test_empty_document_is_the_last_resort() {
        assert_eq!(pick_initial_content(None, None, None), empty_document());
    }
}
