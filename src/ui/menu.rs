use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::EndReason;
use crate::ledger::{ResultEntry, format_elapsed};

/// Draws the name prompt shown before each game.
pub fn render_start_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    name: &str,
    name_invalid: bool,
    message: Option<&str>,
) {
    let popup = centered_popup(area, 80, 70);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let field_style = if name_invalid {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    let mut body = vec![
        Line::from(vec![
            Span::raw("Name: "),
            Span::styled(format!("{name}_"), field_style),
        ]),
        Line::from(if name_invalid {
            Span::styled("Enter your name to play", Style::default().fg(Color::Red))
        } else {
            Span::raw("")
        }),
        Line::from("[Enter] Start  [Esc] Quit"),
        Line::from("[Ctrl+D] Clear results"),
    ];
    if let Some(message) = message {
        body.push(Line::from(Span::styled(
            message.to_owned(),
            Style::default().fg(Color::Yellow),
        )));
    }

    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD move, P pauses"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P]/[Space] Resume"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the dismissible game-over notice.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    result: Option<&ResultEntry>,
    end_reason: Option<EndReason>,
) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from("GAME OVER"), Line::from("")];
    if let Some(result) = result {
        lines.push(Line::from(format!("Level: {}", result.level)));
        lines.push(Line::from(format!(
            "Time: {}",
            format_elapsed(result.elapsed_secs)
        )));
    }
    lines.push(Line::from(end_reason.map_or("", reason_text)));
    lines.push(Line::from(""));
    lines.push(Line::from("[Enter]/[Esc] Close"));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn reason_text(reason: EndReason) -> &'static str {
    match reason {
        EndReason::WallCollision => "Cause: hit wall",
        EndReason::SelfCollision => "Cause: hit yourself",
        EndReason::BoardFilled => "The board is full!",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
