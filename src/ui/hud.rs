use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::{GameSession, GameStatus};
use crate::ledger::format_elapsed;
use crate::render::BoardRenderer;

const SEPARATOR: &str = " │ ";

/// Renders the one-line HUD under `area` and returns the space above it.
#[must_use]
pub fn render_hud<R: BoardRenderer>(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &GameSession<R>,
) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(hud_line(session))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        hud_area,
    );

    play_area
}

fn hud_line<R: BoardRenderer>(session: &GameSession<R>) -> Line<'static> {
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let length = session.snake().map_or(0, |snake| snake.len());
    let player = if session.player_name().is_empty() {
        "-".to_owned()
    } else {
        session.player_name().to_owned()
    };

    let mut spans = vec![
        Span::raw("Player: "),
        Span::styled(player, value),
        Span::raw(SEPARATOR),
        Span::raw("Level: "),
        Span::styled(session.level().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Time: "),
        Span::styled(format_elapsed(session.elapsed_secs()), value),
        Span::raw(SEPARATOR),
        Span::raw("Length: "),
        Span::styled(length.to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Speed: "),
        Span::styled(format!("{} ms", session.speed_ms()), value),
    ];

    if session.status() == GameStatus::Paused {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled("PAUSED", Style::default().fg(Color::Yellow)));
    }

    Line::from(spans)
}
