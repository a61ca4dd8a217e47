use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

/// Semantic classes the analysis contract is allowed to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpanClass {
    Correct,
    Incorrect,
    Omitted,
    Plain,
}

impl SpanClass {
    fn from_attr(attr: &str) -> Self {
        match attr {
            "correct" => SpanClass::Correct,
            "incorrect" => SpanClass::Incorrect,
            "omitted" => SpanClass::Omitted,
            // Unknown classes render as plain text rather than failing.
            _ => SpanClass::Plain,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Piece {
    Text(String, SpanClass),
    Newline,
}

/// Render the service's highlighted reference HTML as themed terminal text.
/// Only the three documented span classes are styled; every other tag is
/// stripped, with `<br>` and `</p>` treated as line breaks.
pub fn lines_from_html(html: &str, theme: &Theme) -> Vec<Line<'static>> {
    let colors = &theme.colors;
    let style_for = |class: SpanClass| match class {
        SpanClass::Correct => Style::default().fg(colors.text_correct()),
        SpanClass::Incorrect => Style::default()
            .fg(colors.text_incorrect())
            .add_modifier(Modifier::UNDERLINED),
        SpanClass::Omitted => Style::default()
            .fg(colors.text_omitted())
            .add_modifier(Modifier::DIM),
        SpanClass::Plain => Style::default().fg(colors.fg()),
    };

    let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
    for piece in parse(html) {
        match piece {
            Piece::Newline => lines.push(Vec::new()),
            Piece::Text(text, class) => {
                let style = style_for(class);
                for (i, part) in text.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(Vec::new());
                    }
                    if !part.is_empty() {
                        if let Some(last) = lines.last_mut() {
                            last.push(Span::styled(part.to_string(), style));
                        }
                    }
                }
            }
        }
    }
    lines.into_iter().map(Line::from).collect()
}

fn parse(html: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut class_stack: Vec<SpanClass> = Vec::new();
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        if open > 0 {
            push_text(&mut pieces, &rest[..open], current(&class_stack));
        }
        let Some(close) = rest[open..].find('>') else {
            // Unterminated tag: treat the remainder as text.
            push_text(&mut pieces, &rest[open..], current(&class_stack));
            return pieces;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let tag_lower = tag.trim().to_ascii_lowercase();
        if tag_lower.starts_with("span") {
            class_stack.push(SpanClass::from_attr(&extract_class(tag)));
        } else if tag_lower == "/span" {
            class_stack.pop();
        } else if tag_lower.starts_with("br") || tag_lower == "/p" {
            pieces.push(Piece::Newline);
        }
        // Any other tag is dropped.
    }
    push_text(&mut pieces, rest, current(&class_stack));
    pieces
}

fn current(stack: &[SpanClass]) -> SpanClass {
    stack.last().copied().unwrap_or(SpanClass::Plain)
}

fn push_text(pieces: &mut Vec<Piece>, raw: &str, class: SpanClass) {
    if raw.is_empty() {
        return;
    }
    pieces.push(Piece::Text(unescape(raw), class));
}

fn extract_class(tag: &str) -> String {
    for quote in ['"', '\''] {
        let needle = format!("class={quote}");
        if let Some(start) = tag.find(&needle) {
            let after = &tag[start + needle.len()..];
            if let Some(end) = after.find(quote) {
                return after[..end].trim().to_ascii_lowercase();
            }
        }
    }
    String::new()
}

fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
