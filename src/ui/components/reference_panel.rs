use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::scoring::normalize::normalize;
use crate::ui::theme::Theme;

/// The reference text with live positional feedback: each word is colored by
/// comparing it (normalized) against the word the user typed at the same
/// position. Untyped words render as pending.
pub struct ReferencePanel<'a> {
    reference: &'a str,
    typed: &'a str,
    theme: &'a Theme,
}

impl<'a> ReferencePanel<'a> {
    pub fn new(reference: &'a str, typed: &'a str, theme: &'a Theme) -> Self {
        Self {
            reference,
            typed,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WordStatus {
    Matched,
    Mismatched,
    Pending,
}

fn word_statuses(reference: &str, typed: &str) -> Vec<(String, WordStatus)> {
    let typed_words: Vec<String> = typed.split_whitespace().map(normalize).collect();

    reference
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let status = match typed_words.get(i) {
                None => WordStatus::Pending,
                Some(t) if *t == normalize(word) => WordStatus::Matched,
                Some(_) => WordStatus::Mismatched,
            };
            (word.to_string(), status)
        })
        .collect()
}

impl Widget for ReferencePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut spans: Vec<Span> = Vec::new();
        for (i, (word, status)) in word_statuses(self.reference, self.typed)
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = match status {
                WordStatus::Matched => Style::default().fg(colors.text_correct()),
                WordStatus::Mismatched => Style::default()
                    .fg(colors.text_incorrect())
                    .add_modifier(Modifier::UNDERLINED),
                WordStatus::Pending => Style::default().fg(colors.text_pending()),
            };
            spans.push(Span::styled(word, style));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border()))
                    .title(" Reference "),
            );
        paragraph.render(area, buf);
    }
}
