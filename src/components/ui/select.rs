use icons::{Check, ChevronDown};
use leptos::context::Provider;
use leptos::prelude::*;
use tw_merge::*;

#[derive(Clone, Copy)]
struct SelectContext {
    open: RwSignal<bool>,
    value_signal: RwSignal<Option<String>>,
    on_change: Option<Callback<Option<String>>>,
}

/// Signal-driven select (trigger + floating option list).
///
/// Open/close state lives entirely in Rust signals; no injected scripts or
/// popover attributes, so the component works the same under wasm tests.
#[component]
pub fn Select(
    children: Children,
    #[prop(optional, into)] class: String,
    #[prop(optional_no_strip)] default_value: Option<String>,
    #[prop(optional, into)] on_change: Option<Callback<Option<String>>>,
) -> impl IntoView {
    let ctx = SelectContext {
        open: RwSignal::new(false),
        value_signal: RwSignal::new(default_value),
        on_change,
    };

    let merged_class = tw_merge!("relative w-fit", class);

    view! {
        <Provider value=ctx>
            <div data-name="Select" class=merged_class>
                {children()}
            </div>
        </Provider>
    }
}

#[component]
pub fn SelectTrigger(children: Children, #[prop(optional, into)] class: String) -> impl IntoView {
    let ctx = expect_context::<SelectContext>();

    let button_class = tw_merge!(
        "w-full p-2 h-9 inline-flex items-center justify-between gap-2 text-sm font-medium whitespace-nowrap rounded-md transition-colors focus-visible:outline-hidden focus-visible:ring-1 focus-visible:ring-ring disabled:cursor-not-allowed disabled:opacity-50 [&_svg:not([class*='size-'])]:size-4 border bg-background border-input hover:bg-accent hover:text-accent-foreground",
        class
    );

    view! {
        <button
            type="button"
            data-name="SelectTrigger"
            class=button_class
            tabindex="0"
            aria-expanded=move || ctx.open.get().to_string()
            on:click=move |_| ctx.open.update(|o| *o = !*o)
        >
            {children()}
            <ChevronDown class="text-muted-foreground" />
        </button>
    }
}

#[component]
pub fn SelectValue(#[prop(optional, into)] placeholder: String) -> impl IntoView {
    let ctx = expect_context::<SelectContext>();

    view! {
        <span data-name="SelectValue" class="text-sm text-muted-foreground truncate">
            {move || ctx.value_signal.get().unwrap_or_else(|| placeholder.clone())}
        </span>
    }
}

#[component]
pub fn SelectContent(children: ChildrenFn, #[prop(optional, into)] class: String) -> impl IntoView {
    let ctx = expect_context::<SelectContext>();

    let merged_class = tw_merge!(
        "absolute top-[calc(100%+4px)] left-0 z-50 min-w-[180px] max-h-[300px] overflow-auto p-1 rounded-md border bg-card shadow-md",
        class
    );

    view! {
        <Show when=move || ctx.open.get() fallback=|| ().into_view()>
            <ul
                data-name="SelectContent"
                role="listbox"
                class=merged_class.clone()
            >
                {children()}
            </ul>
        </Show>
    }
}

#[component]
pub fn SelectOption(
    children: Children,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] value: Option<String>,
) -> impl IntoView {
    let ctx = expect_context::<SelectContext>();

    let merged_class = tw_merge!(
        "group inline-flex gap-2 items-center w-full rounded-sm px-2 py-1.5 text-sm cursor-pointer transition-colors text-popover-foreground hover:bg-accent hover:text-accent-foreground [&_svg:not([class*='size-'])]:size-4",
        class
    );

    let value_for_check = value.clone();
    let is_selected = move || ctx.value_signal.get() == value_for_check && value_for_check.is_some();

    view! {
        <li
            data-name="SelectOption"
            class=merged_class
            role="option"
            tabindex="0"
            aria-selected=move || is_selected().to_string()
            on:click=move |_| {
                let val = value.clone();
                ctx.value_signal.set(val.clone());
                ctx.open.set(false);
                if let Some(on_change) = ctx.on_change {
                    on_change.run(val);
                }
            }
        >
            {children()}
            <Check class="ml-auto opacity-0 size-4 text-muted-foreground group-aria-selected:opacity-100" />
        </li>
    }
}
