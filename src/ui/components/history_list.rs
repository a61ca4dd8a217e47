use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::store::schema::HistoryEntry;
use crate::ui::theme::Theme;

/// Scrollable list of past results for the signed-in user, newest first.
pub struct HistoryList<'a> {
    entries: &'a [HistoryEntry],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> HistoryList<'a> {
    pub fn new(entries: &'a [HistoryEntry], selected: usize, theme: &'a Theme) -> Self {
        Self {
            entries,
            selected,
            theme,
        }
    }
}

fn truncated(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let head: String = name.chars().take(max.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    }
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut lines: Vec<Line> = Vec::new();
        if self.entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "No results yet. Finish a practice session to see it here.",
                Style::default().fg(colors.text_pending()),
            )));
        }

        // Keep the selected row visible within the bordered area.
        let visible = area.height.saturating_sub(2) as usize;
        let first = if visible == 0 {
            0
        } else {
            self.selected.saturating_sub(visible.saturating_sub(1))
        };

        for (i, entry) in self.entries.iter().enumerate().skip(first).take(visible) {
            let row = format!(
                "{}  {:<24}  {:>5.0}%  {:>6.1} wpm  {:>4}s",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                truncated(&entry.source_file_name, 24),
                entry.record.accuracy,
                entry.record.typing_speed_wpm,
                entry.elapsed_seconds,
            );
            let style = if i == self.selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border()))
                    .title(" History "),
            )
            .render(area, buf);
    }
}
