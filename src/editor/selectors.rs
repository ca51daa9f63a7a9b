use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Label};
use crate::editor::markup::InlineMark;
use crate::models::{BlockKind, SELECTABLE_KINDS};
use icons::Check;
use leptos::prelude::*;

/// Open/closed state of the three bubble-menu popovers.
///
/// The toggles are deliberately independent booleans with no mutual
/// exclusion: more than one panel may be open at once, and each panel decides
/// what to render on its own. Collapsing the selection closes all three.
#[derive(Clone, Copy)]
pub(crate) struct BubbleState {
    pub open_node: RwSignal<bool>,
    pub open_link: RwSignal<bool>,
    pub open_color: RwSignal<bool>,
}

impl BubbleState {
    pub fn new() -> Self {
        Self {
            open_node: RwSignal::new(false),
            open_link: RwSignal::new(false),
            open_color: RwSignal::new(false),
        }
    }

    pub fn close_all(&self) {
        self.open_node.set(false);
        self.open_link.set(false);
        self.open_color.set(false);
    }
}

pub(crate) const TEXT_COLORS: [(&str, &str); 6] = [
    ("Gray", "#6b7280"),
    ("Red", "#ef4444"),
    ("Orange", "#f97316"),
    ("Green", "#22c55e"),
    ("Blue", "#3b82f6"),
    ("Purple", "#a855f7"),
];

/// Bold/italic/code buttons. No popover of their own; they act on the
/// selection directly.
#[component]
pub fn TextButtons(on_mark: Callback<InlineMark>) -> impl IntoView {
    let marks: [(&'static str, &'static str, InlineMark); 3] = [
        ("B", "font-bold", InlineMark::Bold),
        ("I", "italic", InlineMark::Italic),
        ("</>", "font-mono text-xs", InlineMark::Code),
    ];

    view! {
        <div class="flex items-center">
            {marks
                .into_iter()
                .map(|(glyph, glyph_class, mark)| {
                    view! {
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title=format!("{mark:?}")
                            on:mousedown=move |ev: web_sys::MouseEvent| {
                                // Keep the editing input focused.
                                ev.prevent_default();
                                on_mark.run(mark);
                            }
                        >
                            <span class=glyph_class>{glyph}</span>
                        </Button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Block-kind picker ("turn into"). Shows the current kind checked.
#[component]
pub fn NodeSelector(
    state: BubbleState,
    #[prop(into)] current: Signal<BlockKind>,
    on_pick: Callback<BlockKind>,
) -> impl IntoView {
    view! {
        <div class="relative">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:aria-expanded=move || state.open_node.get().to_string()
                on:mousedown=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    state.open_node.update(|o| *o = !*o);
                }
            >
                {move || current.get().to_string()}
            </Button>

            <Show when=move || state.open_node.get() fallback=|| ().into_view()>
                <div class="absolute top-[calc(100%+4px)] left-0 z-50 w-44 rounded-md border bg-card p-1 shadow-md">
                    {SELECTABLE_KINDS
                        .into_iter()
                        .map(|kind| {
                            view! {
                                <button
                                    type="button"
                                    class="flex w-full items-center justify-between rounded-sm px-2 py-1.5 text-sm hover:bg-accent hover:text-accent-foreground"
                                    on:mousedown=move |ev: web_sys::MouseEvent| {
                                        ev.prevent_default();
                                        on_pick.run(kind);
                                        state.open_node.set(false);
                                    }
                                >
                                    <span>{kind.to_string()}</span>
                                    <Show
                                        when=move || current.get() == kind
                                        fallback=|| ().into_view()
                                    >
                                        <Check class="size-4 text-muted-foreground" />
                                    </Show>
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

/// Link popover: a url field applied to the selected text.
#[component]
pub fn LinkSelector(state: BubbleState, on_apply: Callback<String>) -> impl IntoView {
    let href: RwSignal<String> = RwSignal::new(String::new());

    let submit = move || {
        let url = href.get_untracked();
        if url.trim().is_empty() {
            return;
        }
        on_apply.run(url);
        href.set(String::new());
        state.open_link.set(false);
    };

    view! {
        <div class="relative">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:aria-expanded=move || state.open_link.get().to_string()
                on:mousedown=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    state.open_link.update(|o| *o = !*o);
                }
            >
                <span class="underline underline-offset-4">"Link"</span>
            </Button>

            <Show when=move || state.open_link.get() fallback=|| ().into_view()>
                <div class="absolute top-[calc(100%+4px)] left-0 z-50 w-60 rounded-md border bg-card p-2 shadow-md">
                    <form
                        class="flex flex-col gap-2"
                        on:submit=move |ev: web_sys::SubmitEvent| {
                            ev.prevent_default();
                            submit();
                        }
                    >
                        <Label class="text-xs">"Paste a link"</Label>
                        <Input
                            r#type="url"
                            placeholder="https://example.com"
                            bind_value=href
                            class="h-8 text-sm"
                        />
                        <Button size=ButtonSize::Sm class="w-full">
                            "Apply"
                        </Button>
                    </form>
                </div>
            </Show>
        </div>
    }
}

/// Color popover: a fixed palette of text colors applied as an inline mark.
#[component]
pub fn ColorSelector(state: BubbleState, on_pick: Callback<String>) -> impl IntoView {
    view! {
        <div class="relative">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:aria-expanded=move || state.open_color.get().to_string()
                on:mousedown=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    state.open_color.update(|o| *o = !*o);
                }
            >
                <span class="font-semibold">"A"</span>
            </Button>

            <Show when=move || state.open_color.get() fallback=|| ().into_view()>
                <div class="absolute top-[calc(100%+4px)] left-0 z-50 w-40 rounded-md border bg-card p-1 shadow-md">
                    <div class="px-2 py-1 text-xs text-muted-foreground">"Color"</div>
                    {TEXT_COLORS
                        .into_iter()
                        .map(|(name, hex)| {
                            view! {
                                <button
                                    type="button"
                                    class="flex w-full items-center gap-2 rounded-sm px-2 py-1.5 text-sm hover:bg-accent hover:text-accent-foreground"
                                    on:mousedown=move |ev: web_sys::MouseEvent| {
                                        ev.prevent_default();
                                        on_pick.run(hex.to_string());
                                        state.open_color.set(false);
                                    }
                                >
                                    <span
                                        class="inline-block size-4 rounded-sm border"
                                        style=format!("background-color: {hex}")
                                    ></span>
                                    <span>{name}</span>
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::markup::is_safe_color;

    #[test]
    fn test_toggles_are_independent() {
        let state = BubbleState::new();

        state.open_node.set(true);
        assert!(state.open_node.get_untracked());
        assert!(!state.open_link.get_untracked());
        assert!(!state.open_color.get_untracked());

        // No mutual exclusion: a second panel may open alongside the first.
        state.open_link.set(true);
        assert!(state.open_node.get_untracked());
        assert!(state.open_link.get_untracked());

        state.close_all();
        assert!(!state.open_node.get_untracked());
        assert!(!state.open_link.get_untracked());
        assert!(!state.open_color.get_untracked());
    }

    #[test]
    fn test_palette_colors_are_safe_hex() {
        for (_, hex) in TEXT_COLORS {
            assert!(is_safe_color(hex), "palette color {hex} must be hex");
        }
    }

    #[test]
    fn test_palette_names_unique() {
        let mut names: Vec<_> = TEXT_COLORS.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TEXT_COLORS.len());
    }
}
