use crate::pages::{DocumentPage, RootPage};
use crate::state::{AppContext, AppState, DocSyncBridge};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext(AppState::new());
    provide_context(ctx.clone());

    // One bridge for the app lifetime; pages bind it to the route's session
    // key. Constructing it here also registers its pagehide flush listener.
    provide_context(DocSyncBridge::new(ctx));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("document/:doc_id") view=DocumentPage />
                <Route path=path!("document") view=DocumentPage />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
