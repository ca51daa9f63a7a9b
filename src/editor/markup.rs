/// Marks the text buttons can toggle on a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InlineMark {
    Bold,
    Italic,
    Code,
}

impl InlineMark {
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            InlineMark::Bold => ("**", "**"),
            InlineMark::Italic => ("*", "*"),
            InlineMark::Code => ("`", "`"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InlineToken {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { label: String, href: String },
    Color { text: String, color: String },
}

/// Parse lightweight inline markup from a block's raw text.
///
/// Rules (MVP):
/// - `**bold**`, `*italic*`, `` `code` ``, `[label](href)`, `[c:#hex]text[/c]`.
/// - No nesting; the first closing delimiter wins.
/// - Unclosed or empty spans are treated as plain text.
pub(crate) fn parse_inline_tokens(input: &str) -> Vec<InlineToken> {
    let mut out: Vec<InlineToken> = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < input.len() {
        if let Some((tok, consumed)) = match_marker(&input[i..]) {
            if i > text_start {
                out.push(InlineToken::Text(input[text_start..i].to_string()));
            }
            out.push(tok);
            i += consumed;
            text_start = i;
        } else {
            // Advance one char (markers are ASCII, so this keeps slice
            // boundaries valid).
            i += input[i..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
        }
    }

    if text_start < input.len() {
        out.push(InlineToken::Text(input[text_start..].to_string()));
    }

    out
}

fn match_marker(rest: &str) -> Option<(InlineToken, usize)> {
    // Order matters: `**` before `*`, `[c:` before `[`.
    if let Some(hit) = match_delimited(rest, "**", "**") {
        let (inner, consumed) = hit;
        return Some((InlineToken::Bold(inner), consumed));
    }
    if let Some((inner, consumed)) = match_delimited(rest, "*", "*") {
        return Some((InlineToken::Italic(inner), consumed));
    }
    if let Some((inner, consumed)) = match_delimited(rest, "`", "`") {
        return Some((InlineToken::Code(inner), consumed));
    }
    if let Some(hit) = match_color(rest) {
        return Some(hit);
    }
    if let Some(hit) = match_link(rest) {
        return Some(hit);
    }
    None
}

fn match_delimited(rest: &str, open: &str, close: &str) -> Option<(String, usize)> {
    let body = rest.strip_prefix(open)?;
    let end = body.find(close)?;
    if end == 0 {
        return None;
    }
    Some((body[..end].to_string(), open.len() + end + close.len()))
}

fn match_link(rest: &str) -> Option<(InlineToken, usize)> {
    let body = rest.strip_prefix('[')?;
    let label_end = body.find("](")?;
    let label = &body[..label_end];

    let href_body = &body[label_end + 2..];
    let href_end = href_body.find(')')?;
    let href = &href_body[..href_end];

    if label.is_empty() || href.is_empty() {
        return None;
    }

    Some((
        InlineToken::Link {
            label: label.to_string(),
            href: href.to_string(),
        },
        1 + label_end + 2 + href_end + 1,
    ))
}

fn match_color(rest: &str) -> Option<(InlineToken, usize)> {
    let body = rest.strip_prefix("[c:")?;
    let color_end = body.find(']')?;
    let color = &body[..color_end];
    if !is_safe_color(color) {
        return None;
    }

    let text_body = &body[color_end + 1..];
    let text_end = text_body.find("[/c]")?;
    let text = &text_body[..text_end];
    if text.is_empty() {
        return None;
    }

    Some((
        InlineToken::Color {
            text: text.to_string(),
            color: color.to_string(),
        },
        3 + color_end + 1 + text_end + 4,
    ))
}

/// Color marks only accept hex colors, so a remote record can never smuggle
/// arbitrary CSS into a style attribute.
pub(crate) fn is_safe_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Wrap `text[start..end]` (byte indices) in an inline delimiter pair.
/// Out-of-range or inverted ranges return the text unchanged.
pub(crate) fn wrap_range(text: &str, start: usize, end: usize, open: &str, close: &str) -> String {
    if start >= end || end > text.len() {
        return text.to_string();
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return text.to_string();
    }

    format!(
        "{}{open}{}{close}{}",
        &text[..start],
        &text[start..end],
        &text[end..]
    )
}

pub(crate) fn wrap_link(text: &str, start: usize, end: usize, href: &str) -> String {
    if href.trim().is_empty() {
        return text.to_string();
    }
    wrap_range(text, start, end, "[", &format!("]({})", href.trim()))
}

pub(crate) fn wrap_color(text: &str, start: usize, end: usize, color: &str) -> String {
    if !is_safe_color(color) {
        return text.to_string();
    }
    wrap_range(text, start, end, &format!("[c:{color}]"), "[/c]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(
            parse_inline_tokens("hello world"),
            vec![InlineToken::Text("hello world".into())]
        );
    }

    #[test]
    fn test_bold_italic_code() {
        assert_eq!(
            parse_inline_tokens("a **b** *c* `d`"),
            vec![
                InlineToken::Text("a ".into()),
                InlineToken::Bold("b".into()),
                InlineToken::Text(" ".into()),
                InlineToken::Italic("c".into()),
                InlineToken::Text(" ".into()),
                InlineToken::Code("d".into()),
            ]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_inline_tokens("see [docs](https://example.com) now"),
            vec![
                InlineToken::Text("see ".into()),
                InlineToken::Link {
                    label: "docs".into(),
                    href: "https://example.com".into(),
                },
                InlineToken::Text(" now".into()),
            ]
        );
    }

    #[test]
    fn test_color_mark() {
        assert_eq!(
            parse_inline_tokens("[c:#ef4444]red[/c]"),
            vec![InlineToken::Color {
                text: "red".into(),
                color: "#ef4444".into(),
            }]
        );
    }

    #[test]
    fn test_unsafe_color_stays_literal() {
        assert_eq!(
            parse_inline_tokens("[c:expression(alert(1))]x[/c]"),
            vec![InlineToken::Text("[c:expression(alert(1))]x[/c]".into())]
        );
    }

    #[test]
    fn test_unclosed_markers_are_plain_text() {
        assert_eq!(
            parse_inline_tokens("**not closed"),
            vec![InlineToken::Text("**not closed".into())]
        );
        assert_eq!(
            parse_inline_tokens("[half](link"),
            vec![InlineToken::Text("[half](link".into())]
        );
    }

    #[test]
    fn test_empty_spans_are_plain_text() {
        assert_eq!(
            parse_inline_tokens("****"),
            vec![InlineToken::Text("****".into())]
        );
    }

    #[test]
    fn test_multibyte_text_around_markers() {
        assert_eq!(
            parse_inline_tokens("héllo **wörld**"),
            vec![
                InlineToken::Text("héllo ".into()),
                InlineToken::Bold("wörld".into()),
            ]
        );
    }

    #[test]
    fn test_is_safe_color() {
        assert!(is_safe_color("#fff"));
        assert!(is_safe_color("#ef4444"));
        assert!(!is_safe_color("red"));
        assert!(!is_safe_color("#gggggg"));
        assert!(!is_safe_color("#ffff"));
    }

    #[test]
    fn test_wrap_range() {
        assert_eq!(wrap_range("hello", 0, 5, "**", "**"), "**hello**");
        assert_eq!(wrap_range("hello", 1, 3, "*", "*"), "h*el*lo");
        // Inverted / out-of-range selections are left alone.
        assert_eq!(wrap_range("hello", 3, 3, "*", "*"), "hello");
        assert_eq!(wrap_range("hello", 2, 99, "*", "*"), "hello");
    }

    #[test]
    fn test_wrap_link_and_color() {
        assert_eq!(
            wrap_link("read this", 5, 9, "https://example.com"),
            "read [this](https://example.com)"
        );
        assert_eq!(wrap_link("read this", 5, 9, "   "), "read this");
        assert_eq!(wrap_color("hot", 0, 3, "#ef4444"), "[c:#ef4444]hot[/c]");
        assert_eq!(wrap_color("hot", 0, 3, "javascript:"), "hot");
    }

    #[test]
    fn test_wrap_then_parse_roundtrip() {
        let wrapped = wrap_range("make this bold", 5, 9, "**", "**");
        let tokens = parse_inline_tokens(&wrapped);
        assert!(tokens.contains(&InlineToken::Bold("this".into())));
    }
}
