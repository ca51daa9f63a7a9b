use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {Command, div, "flex flex-col w-full overflow-hidden rounded-md border bg-card text-popover-foreground shadow-md"}
    clx! {CommandList, div, "overflow-y-auto overflow-x-hidden max-h-[330px] scroll-py-1 p-1"}
}

#[allow(unused_imports)]
pub use components::*;

/// Inline command menu building blocks.
///
/// Unlike dialog-style command palettes, these carry no document-level key
/// handling or filtering of their own: the owning editor already handles key
/// events and decides which items are visible, so the components here are
/// purely presentational.
#[component]
pub fn CommandEmpty(children: Children, #[prop(optional, into)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("px-2 py-4 text-sm text-center text-muted-foreground", class);

    view! {
        <div data-name="CommandEmpty" class=merged_class>
            {children()}
        </div>
    }
}

#[component]
pub fn CommandItem(
    children: Children,
    #[prop(optional, into)] class: String,
    #[prop(default = false.into(), into)] selected: Signal<bool>,
    /// Fired on mousedown so the owning input keeps focus (a click would blur
    /// it before the command runs).
    #[prop(optional, into)]
    on_mousedown: Option<Callback<web_sys::MouseEvent>>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "flex w-full items-center gap-2 rounded-md px-2 py-1.5 text-left text-sm cursor-pointer select-none hover:bg-muted aria-selected:bg-muted",
        class
    );

    view! {
        <div
            data-name="CommandItem"
            class=merged_class
            role="option"
            tabindex="0"
            aria-selected=move || selected.get().to_string()
            on:mousedown=move |ev| {
                if let Some(cb) = on_mousedown {
                    cb.run(ev);
                }
            }
        >
            {children()}
        </div>
    }
}
