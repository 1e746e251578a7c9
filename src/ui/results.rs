use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Row, Table};
use unicode_width::UnicodeWidthChar;

use crate::ledger::{ResultEntry, format_elapsed};

const NAME_COLUMN_WIDTH: u16 = 16;

/// Draws the results table, oldest game first.
pub fn render_results(frame: &mut Frame<'_>, area: Rect, entries: &[ResultEntry]) {
    let header = Row::new(["Name", "Level", "Time"]).style(
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    );

    let rows = entries.iter().map(|entry| {
        Row::new([
            truncate_to_width(&entry.player_name, usize::from(NAME_COLUMN_WIDTH)),
            entry.level.to_string(),
            format_elapsed(entry.elapsed_secs),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(NAME_COLUMN_WIDTH),
            Constraint::Length(5),
            Constraint::Min(5),
        ],
    )
    .header(header)
    .block(Block::bordered().title(" results "));

    frame.render_widget(table, area);
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut
/// with an ellipsis.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= max_width {
        return text.to_owned();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let width = c.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(c);
    }
    out.push('…');
    out
}
