pub(crate) mod markup;
pub(crate) mod selectors;
pub(crate) mod suggestions;

use crate::components::ui::{
    Command, CommandEmpty, CommandItem, CommandList, Separator, SeparatorOrientation,
};
use crate::editor::markup::{
    parse_inline_tokens, wrap_color, wrap_link, wrap_range, InlineMark, InlineToken,
};
use crate::editor::selectors::{
    BubbleState, ColorSelector, LinkSelector, NodeSelector, TextButtons,
};
use crate::editor::suggestions::{filter_suggestions, slash_query, SuggestionEntry};
use crate::models::{blocks_to_tree, tree_to_blocks, Block, BlockKind, DocNode};
use crate::util::next_block_id;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

fn utf16_to_byte_idx(s: &str, pos_utf16: u32) -> usize {
    if pos_utf16 == 0 {
        return 0;
    }
    let mut acc: u32 = 0;
    for (i, ch) in s.char_indices() {
        let w = ch.len_utf16() as u32;
        if acc + w > pos_utf16 {
            return i;
        }
        acc += w;
        if acc == pos_utf16 {
            return i + ch.len_utf8();
        }
    }
    s.len()
}

fn byte_idx_to_utf16(s: &str, byte_idx: usize) -> u32 {
    s[..byte_idx.min(s.len())].encode_utf16().count() as u32
}

/// Update a block's text in the local in-memory list.
///
/// Used by every mutation path (typing, mark wrapping, link/color apply) so
/// the list and the editing buffer cannot drift apart.
pub(crate) fn apply_block_text(blocks: &mut [Block], block_id: &str, text: &str) -> bool {
    if let Some(b) = blocks.iter_mut().find(|b| b.id == block_id) {
        b.text = text.to_string();
        true
    } else {
        false
    }
}

pub(crate) fn set_block_kind(blocks: &mut [Block], block_id: &str, kind: BlockKind) -> bool {
    if let Some(b) = blocks.iter_mut().find(|b| b.id == block_id) {
        b.kind = kind;
        if kind != BlockKind::TaskItem {
            b.checked = false;
        }
        true
    } else {
        false
    }
}

pub(crate) fn toggle_block_checked(blocks: &mut [Block], block_id: &str) -> bool {
    if let Some(b) = blocks.iter_mut().find(|b| b.id == block_id) {
        b.checked = !b.checked;
        true
    } else {
        false
    }
}

/// Insert after the given block; appends if the anchor is gone.
pub(crate) fn insert_block_after(blocks: &mut Vec<Block>, block_id: &str, block: Block) {
    match blocks.iter().position(|b| b.id == block_id) {
        Some(idx) => blocks.insert(idx + 1, block),
        None => blocks.push(block),
    }
}

/// Remove a block, returning its former index. The last remaining block is
/// never removed.
pub(crate) fn remove_block(blocks: &mut Vec<Block>, block_id: &str) -> Option<usize> {
    if blocks.len() <= 1 {
        return None;
    }
    let idx = blocks.iter().position(|b| b.id == block_id)?;
    blocks.remove(idx);
    Some(idx)
}

/// Block kind Enter continues with: list-ish kinds keep their kind, anything
/// else starts a paragraph.
pub(crate) fn continuation_kind(kind: BlockKind) -> BlockKind {
    match kind {
        BlockKind::BulletItem | BlockKind::NumberedItem | BlockKind::TaskItem => kind,
        _ => BlockKind::Paragraph,
    }
}

/// 1-based position of a numbered item within its contiguous run.
pub(crate) fn numbered_ordinal(blocks: &[Block], block_id: &str) -> usize {
    let Some(idx) = blocks.iter().position(|b| b.id == block_id) else {
        return 1;
    };

    let mut ordinal = 1;
    for b in blocks[..idx].iter().rev() {
        if b.kind == BlockKind::NumberedItem {
            ordinal += 1;
        } else {
            break;
        }
    }
    ordinal
}

fn render_inline(text: &str) -> impl IntoView {
    parse_inline_tokens(text)
        .into_iter()
        .map(|tok| match tok {
            InlineToken::Text(s) => view! { <span>{s}</span> }.into_any(),
            InlineToken::Bold(s) => view! { <strong>{s}</strong> }.into_any(),
            InlineToken::Italic(s) => view! { <em>{s}</em> }.into_any(),
            InlineToken::Code(s) => {
                view! { <code class="rounded bg-muted px-1 font-mono text-[0.85em]">{s}</code> }
                    .into_any()
            }
            InlineToken::Link { label, href } => view! {
                <a
                    class="text-primary underline underline-offset-4"
                    href=href
                    target="_blank"
                    rel="noreferrer"
                >
                    {label}
                </a>
            }
            .into_any(),
            InlineToken::Color { text, color } => {
                view! { <span style=format!("color: {color}")>{text}</span> }.into_any()
            }
        })
        .collect_view()
}

/// Block-based editing surface.
///
/// Emits a whole-tree snapshot through `on_update` after every accepted
/// mutation; the caller owns what happens with it. Remount (new `id` on the
/// wrapping element) is the only way `initial_content` is re-read.
#[component]
pub fn DocumentSurface(initial_content: DocNode, on_update: Callback<DocNode>) -> impl IntoView {
    let blocks: RwSignal<Vec<Block>> =
        RwSignal::new(tree_to_blocks(&initial_content, next_block_id));

    // Editing state
    let editing_id: RwSignal<Option<String>> = RwSignal::new(None);
    let editing_value: RwSignal<String> = RwSignal::new(String::new());
    let target_cursor_col: RwSignal<Option<u32>> = RwSignal::new(None);
    let editing_ref: NodeRef<html::Input> = NodeRef::new();

    // Slash menu
    let menu_open: RwSignal<bool> = RwSignal::new(false);
    let menu_query: RwSignal<String> = RwSignal::new(String::new());
    let menu_index: RwSignal<usize> = RwSignal::new(0);

    // Text selection in the editing input, as byte indices into its value.
    let selection: RwSignal<Option<(usize, usize)>> = RwSignal::new(None);
    let bubble = BubbleState::new();

    // Focus the inline editor when editing_id changes.
    Effect::new(move |_| {
        let id = editing_id.get();
        if id.is_none() {
            return;
        }

        let col = target_cursor_col.get_untracked();
        if let Some(el) = editing_ref.get() {
            // Focus on next tick so the node is mounted.
            let _ = web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    wasm_bindgen::closure::Closure::once_into_js(move || {
                        let _ = el.focus();
                        if let Some(col) = col {
                            // selectionStart/End are in UTF-16 code units.
                            let len = el.value().encode_utf16().count() as u32;
                            let pos = col.min(len);
                            let _ = el.set_selection_range(pos, pos);
                        }
                    })
                    .as_ref()
                    .unchecked_ref(),
                    0,
                );
        }
    });

    view! {
        <div class="rounded-xl border p-4">
            <div class="space-y-0.5">
                <For
                    each={move || blocks.get().iter().map(|b| b.id.clone()).collect::<Vec<_>>()}
                    key={|id| id.clone()}
                    children={move |id| {
                        view! {
                            <BlockRow
                                block_id=id
                                blocks=blocks
                                editing_id=editing_id
                                editing_value=editing_value
                                target_cursor_col=target_cursor_col
                                editing_ref=editing_ref
                                menu_open=menu_open
                                menu_query=menu_query
                                menu_index=menu_index
                                selection=selection
                                bubble=bubble
                                on_update=on_update
                            />
                        }
                    }}
                />
            </div>
        </div>
    }
}

#[component]
fn BlockRow(
    block_id: String,
    blocks: RwSignal<Vec<Block>>,
    editing_id: RwSignal<Option<String>>,
    editing_value: RwSignal<String>,
    target_cursor_col: RwSignal<Option<u32>>,
    editing_ref: NodeRef<html::Input>,
    menu_open: RwSignal<bool>,
    menu_query: RwSignal<String>,
    menu_index: RwSignal<usize>,
    selection: RwSignal<Option<(usize, usize)>>,
    bubble: BubbleState,
    on_update: Callback<DocNode>,
) -> impl IntoView {
    let id_sv = StoredValue::new(block_id);

    let block = Memo::new(move |_| {
        let id = id_sv.get_value();
        blocks.get().into_iter().find(|b| b.id == id)
    });

    let is_editing = move || editing_id.get().as_deref() == Some(id_sv.get_value().as_str());

    let emit = move || {
        on_update.run(blocks_to_tree(&blocks.get_untracked()));
    };

    let set_text = move |new_text: String| {
        editing_value.set(new_text.clone());
        blocks.update(|all| {
            apply_block_text(all, &id_sv.get_value(), &new_text);
        });
        emit();
    };

    let close_menu = move || {
        menu_open.set(false);
        menu_query.set(String::new());
        menu_index.set(0);
    };

    let start_edit = move |col: Option<u32>| {
        let Some(b) = block.get_untracked() else {
            return;
        };
        editing_value.set(b.text.clone());
        target_cursor_col.set(col.or_else(|| Some(byte_idx_to_utf16(&b.text, b.text.len()))));
        editing_id.set(Some(b.id));
        selection.set(None);
        bubble.close_all();
        close_menu();
    };

    let filtered = Memo::new(move |_| filter_suggestions(&menu_query.get()));

    let apply_suggestion = move |entry: SuggestionEntry| {
        blocks.update(|all| {
            if let Some(b) = all.iter_mut().find(|b| b.id == id_sv.get_value()) {
                entry.apply(b);
            }
        });
        editing_value.set(String::new());
        close_menu();
        emit();
    };

    let on_input = move |ev: web_sys::Event| {
        let v = event_target_value(&ev);
        editing_value.set(v.clone());
        blocks.update(|all| {
            apply_block_text(all, &id_sv.get_value(), &v);
        });
        emit();

        // Typing collapses any selection, which dismisses the bubble.
        selection.set(None);
        bubble.close_all();

        match slash_query(&v) {
            Some(q) => {
                menu_query.set(q);
                menu_index.set(0);
                menu_open.set(true);
            }
            None => close_menu(),
        }
    };

    let on_select = move |_ev: web_sys::Event| {
        let Some(el) = editing_ref.get_untracked() else {
            return;
        };
        let text = el.value();
        let start = el.selection_start().ok().flatten().unwrap_or(0);
        let end = el.selection_end().ok().flatten().unwrap_or(start);

        if end > start {
            let sb = utf16_to_byte_idx(&text, start);
            let eb = utf16_to_byte_idx(&text, end);
            selection.set(Some((sb, eb)));
        } else {
            selection.set(None);
            bubble.close_all();
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let key = ev.key();

        if menu_open.get_untracked() {
            let items = filtered.get_untracked();
            match key.as_str() {
                "ArrowDown" => {
                    ev.prevent_default();
                    let last = items.len().saturating_sub(1);
                    menu_index.update(|i| *i = (*i + 1).min(last));
                    return;
                }
                "ArrowUp" => {
                    ev.prevent_default();
                    menu_index.update(|i| *i = i.saturating_sub(1));
                    return;
                }
                "Enter" => {
                    ev.prevent_default();
                    if let Some(entry) = items.get(menu_index.get_untracked()).copied() {
                        apply_suggestion(entry);
                    }
                    return;
                }
                "Escape" => {
                    ev.prevent_default();
                    close_menu();
                    return;
                }
                _ => {}
            }
        }

        match key.as_str() {
            "Enter" => {
                ev.prevent_default();
                let id = id_sv.get_value();
                let kind = blocks
                    .get_untracked()
                    .iter()
                    .find(|b| b.id == id)
                    .map(|b| b.kind)
                    .unwrap_or_default();

                let new_block = Block::new(next_block_id(), continuation_kind(kind), "");
                let new_id = new_block.id.clone();
                blocks.update(|all| insert_block_after(all, &id, new_block));

                editing_value.set(String::new());
                target_cursor_col.set(Some(0));
                editing_id.set(Some(new_id));
                emit();
            }
            "Backspace" => {
                if !editing_value.get_untracked().is_empty() {
                    return;
                }

                let id = id_sv.get_value();
                let all = blocks.get_untracked();
                let Some(idx) = all.iter().position(|b| b.id == id) else {
                    return;
                };
                if all.len() <= 1 {
                    return;
                }
                ev.prevent_default();

                // Focus the previous block (or the next one when removing the
                // first), cursor at its end.
                let neighbor = if idx > 0 { &all[idx - 1] } else { &all[idx + 1] };
                let neighbor_id = neighbor.id.clone();
                let neighbor_text = neighbor.text.clone();

                blocks.update(|v| {
                    remove_block(v, &id);
                });
                editing_value.set(neighbor_text.clone());
                target_cursor_col.set(Some(byte_idx_to_utf16(
                    &neighbor_text,
                    neighbor_text.len(),
                )));
                editing_id.set(Some(neighbor_id));
                emit();
            }
            "Escape" => {
                editing_id.set(None);
                selection.set(None);
                bubble.close_all();
            }
            _ => {}
        }
    };

    // Bubble actions. Selection byte indices were captured at select-time, so
    // they stay valid while a popover input holds focus.
    let apply_mark = Callback::new(move |mark: InlineMark| {
        if let Some((s, e)) = selection.get_untracked() {
            let (open, close) = mark.delimiters();
            let wrapped = wrap_range(&editing_value.get_untracked(), s, e, open, close);
            set_text(wrapped);
            selection.set(None);
            bubble.close_all();
        }
    });

    let apply_link = Callback::new(move |href: String| {
        if let Some((s, e)) = selection.get_untracked() {
            let wrapped = wrap_link(&editing_value.get_untracked(), s, e, &href);
            set_text(wrapped);
            selection.set(None);
            bubble.close_all();
        }
    });

    let apply_color = Callback::new(move |color: String| {
        if let Some((s, e)) = selection.get_untracked() {
            let wrapped = wrap_color(&editing_value.get_untracked(), s, e, &color);
            set_text(wrapped);
            selection.set(None);
            bubble.close_all();
        }
    });

    let apply_kind = Callback::new(move |kind: BlockKind| {
        blocks.update(|all| {
            set_block_kind(all, &id_sv.get_value(), kind);
        });
        emit();
    });

    let current_kind = Signal::derive(move || {
        block.get().map(|b| b.kind).unwrap_or_default()
    });

    let toggle_checked = move |_ev: web_sys::Event| {
        blocks.update(|all| {
            toggle_block_checked(all, &id_sv.get_value());
        });
        emit();
    };

    view! {
        <Show when=move || block.get().is_some() fallback=|| ().into_view()>
            <div class="group relative">
                <Show
                    when=is_editing
                    fallback=move || {
                        let Some(b) = block.get() else {
                            return ().into_any();
                        };
                        let ordinal = numbered_ordinal(&blocks.get(), &b.id);
                        rendered_block(b, ordinal, move |_| start_edit(None), toggle_checked)
                            .into_any()
                    }
                >
                    <div class="relative">
                        // Bubble menu, shown while a text selection is active.
                        <Show when=move || selection.get().is_some() fallback=|| ().into_view()>
                            <div class="absolute bottom-[calc(100%+4px)] left-0 z-40 flex w-fit items-center gap-0.5 rounded-md border bg-card px-1 py-0.5 shadow-xl">
                                <NodeSelector state=bubble current=current_kind on_pick=apply_kind />
                                <Separator orientation=SeparatorOrientation::Vertical class="h-5" />
                                <LinkSelector state=bubble on_apply=apply_link />
                                <Separator orientation=SeparatorOrientation::Vertical class="h-5" />
                                <TextButtons on_mark=apply_mark />
                                <Separator orientation=SeparatorOrientation::Vertical class="h-5" />
                                <ColorSelector state=bubble on_pick=apply_color />
                            </div>
                        </Show>

                        <input
                            class="w-full rounded-md border border-transparent bg-transparent px-2 py-1 text-sm outline-none focus:border-input"
                            prop:value=move || editing_value.get()
                            on:input=on_input
                            on:select=on_select
                            on:keydown=on_keydown
                            node_ref=editing_ref
                        />

                        // Slash command menu.
                        <Show when=move || menu_open.get() fallback=|| ().into_view()>
                            <div class="absolute top-[calc(100%+4px)] left-2 z-50 w-72">
                                <Command>
                                    <CommandList>
                                        {move || {
                                            let items = filtered.get();
                                            if items.is_empty() {
                                                view! { <CommandEmpty>"No results"</CommandEmpty> }
                                                    .into_any()
                                            } else {
                                                items
                                                    .into_iter()
                                                    .enumerate()
                                                    .map(|(i, entry)| {
                                                        let selected =
                                                            Signal::derive(move || menu_index.get() == i);
                                                        view! {
                                                            <CommandItem
                                                                selected=selected
                                                                on_mousedown=Callback::new(
                                                                    move |ev: web_sys::MouseEvent| {
                                                                        ev.prevent_default();
                                                                        apply_suggestion(entry);
                                                                    },
                                                                )
                                                            >
                                                                <div class="flex size-9 shrink-0 items-center justify-center rounded-md border bg-background text-xs font-medium">
                                                                    {entry.icon}
                                                                </div>
                                                                <div class="min-w-0">
                                                                    <p class="text-sm font-medium">{entry.title}</p>
                                                                    <p class="truncate text-xs text-muted-foreground">
                                                                        {entry.description}
                                                                    </p>
                                                                </div>
                                                            </CommandItem>
                                                        }
                                                    })
                                                    .collect_view()
                                                    .into_any()
                                            }
                                        }}
                                    </CommandList>
                                </Command>
                            </div>
                        </Show>
                    </div>
                </Show>
            </div>
        </Show>
    }
}

fn rendered_block(
    b: Block,
    ordinal: usize,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
    on_toggle: impl Fn(web_sys::Event) + 'static,
) -> impl IntoView {
    let base = "cursor-text rounded-md px-2 py-1 hover:bg-muted/50";

    match b.kind {
        BlockKind::Heading1 => view! {
            <h1 class=format!("{base} text-2xl font-semibold") on:click=on_click>
                {render_inline(&b.text)}
            </h1>
        }
        .into_any(),
        BlockKind::Heading2 => view! {
            <h2 class=format!("{base} text-xl font-semibold") on:click=on_click>
                {render_inline(&b.text)}
            </h2>
        }
        .into_any(),
        BlockKind::Heading3 => view! {
            <h3 class=format!("{base} text-lg font-medium") on:click=on_click>
                {render_inline(&b.text)}
            </h3>
        }
        .into_any(),
        BlockKind::BulletItem => view! {
            <div class=format!("{base} flex gap-2 text-sm") on:click=on_click>
                <span class="select-none text-muted-foreground">"•"</span>
                <span>{render_inline(&b.text)}</span>
            </div>
        }
        .into_any(),
        BlockKind::NumberedItem => view! {
            <div class=format!("{base} flex gap-2 text-sm") on:click=on_click>
                <span class="select-none text-muted-foreground">{format!("{ordinal}.")}</span>
                <span>{render_inline(&b.text)}</span>
            </div>
        }
        .into_any(),
        BlockKind::Quote => view! {
            <blockquote
                class=format!("{base} border-l-2 pl-3 text-sm italic text-muted-foreground")
                on:click=on_click
            >
                {render_inline(&b.text)}
            </blockquote>
        }
        .into_any(),
        BlockKind::Code => view! {
            // Code blocks render raw text; inline markup stays literal.
            <pre
                class=format!("{base} whitespace-pre-wrap rounded-md bg-muted px-3 py-2 font-mono text-sm")
                on:click=on_click
            >
                {b.text.clone()}
            </pre>
        }
        .into_any(),
        BlockKind::TaskItem => {
            let checked = b.checked;
            let text_class = if checked {
                "line-through text-muted-foreground"
            } else {
                ""
            };
            view! {
                <div class=format!("{base} flex items-center gap-2 text-sm")>
                    <input
                        type="checkbox"
                        class="size-4 accent-primary"
                        prop:checked=checked
                        on:change=on_toggle
                    />
                    <span class=text_class on:click=on_click>
                        {render_inline(&b.text)}
                    </span>
                </div>
            }
            .into_any()
        }
        BlockKind::Paragraph => {
            if b.text.is_empty() {
                view! {
                    <p class=format!("{base} text-sm text-muted-foreground/60") on:click=on_click>
                        "Type '/' for commands"
                    </p>
                }
                .into_any()
            } else {
                view! {
                    <p class=format!("{base} text-sm") on:click=on_click>
                        {render_inline(&b.text)}
                    </p>
                }
                .into_any()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blocks() -> Vec<Block> {
        vec![
            Block::new("a".into(), BlockKind::Heading1, "Title"),
            Block::new("b".into(), BlockKind::Paragraph, "body"),
            Block::new("c".into(), BlockKind::NumberedItem, "first"),
            Block::new("d".into(), BlockKind::NumberedItem, "second"),
        ]
    }

    #[test]
    fn test_apply_block_text() {
        let mut blocks = sample_blocks();
        assert!(apply_block_text(&mut blocks, "b", "edited"));
        assert_eq!(blocks[1].text, "edited");
        assert!(!apply_block_text(&mut blocks, "missing", "x"));
    }

    #[test]
    fn test_set_block_kind_resets_task_checkbox() {
        let mut blocks = vec![Block {
            id: "t".into(),
            kind: BlockKind::TaskItem,
            text: "task".into(),
            checked: true,
        }];

        assert!(set_block_kind(&mut blocks, "t", BlockKind::Paragraph));
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert!(!blocks[0].checked);
    }

    #[test]
    fn test_insert_block_after_anchor_and_fallback() {
        let mut blocks = sample_blocks();
        insert_block_after(&mut blocks, "a", Block::new("x".into(), BlockKind::Paragraph, ""));
        assert_eq!(blocks[1].id, "x");

        insert_block_after(&mut blocks, "gone", Block::new("y".into(), BlockKind::Paragraph, ""));
        assert_eq!(blocks.last().map(|b| b.id.as_str()), Some("y"));
    }

    #[test]
    fn test_remove_block_keeps_last_one() {
        let mut blocks = sample_blocks();
        assert_eq!(remove_block(&mut blocks, "b"), Some(1));
        assert_eq!(blocks.len(), 3);

        let mut single = vec![Block::new("only".into(), BlockKind::Paragraph, "")];
        assert_eq!(remove_block(&mut single, "only"), None);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_continuation_kind() {
        assert_eq!(
            continuation_kind(BlockKind::BulletItem),
            BlockKind::BulletItem
        );
        assert_eq!(continuation_kind(BlockKind::TaskItem), BlockKind::TaskItem);
        assert_eq!(continuation_kind(BlockKind::Heading1), BlockKind::Paragraph);
        assert_eq!(continuation_kind(BlockKind::Quote), BlockKind::Paragraph);
    }

    #[test]
    fn test_numbered_ordinal_counts_contiguous_run() {
        let blocks = sample_blocks();
        assert_eq!(numbered_ordinal(&blocks, "c"), 1);
        assert_eq!(numbered_ordinal(&blocks, "d"), 2);
    }

    #[test]
    fn test_utf16_byte_index_conversion() {
        let s = "héllo wörld";
        let start_utf16 = byte_idx_to_utf16(s, 0);
        assert_eq!(start_utf16, 0);

        // 'ö' is 2 bytes but 1 UTF-16 unit.
        let o_byte = s.find('ö').unwrap();
        let o_utf16 = byte_idx_to_utf16(s, o_byte);
        assert_eq!(utf16_to_byte_idx(s, o_utf16), o_byte);

        assert_eq!(utf16_to_byte_idx(s, 999), s.len());
    }
}
