use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::app::App;
use crate::game::GameStatus;
use crate::input::Direction;
use crate::render::{BoardView, CellContent};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};
use crate::ui::results::render_results;

/// Terminal columns used per logical cell, which keeps cells roughly square.
const CELL_WIDTH: u16 = 2;

const RESULTS_PANEL_WIDTH: u16 = 34;

const GLYPH_SNAKE_BODY: &str = "██";
const GLYPH_SNAKE_HEAD_UP: &str = "▲▲";
const GLYPH_SNAKE_HEAD_DOWN: &str = "▼▼";
const GLYPH_SNAKE_HEAD_LEFT: &str = "◀◀";
const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶▶";
const GLYPH_FOOD: &str = "◆ ";

const COLOR_BORDER: Color = Color::DarkGray;
const COLOR_SNAKE_BODY: Color = Color::Green;
const COLOR_SNAKE_HEAD: Color = Color::LightGreen;
const COLOR_FOOD: Color = Color::Red;

/// Renders the full frame from immutable app state.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let [game_area, results_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(RESULTS_PANEL_WIDTH),
    ])
    .areas(frame.area());

    render_results(frame, results_area, app.session().ledger().entries());

    let play_area = render_hud(frame, game_area, app.session());
    let board_area = board_rect(play_area, app.session().renderer());

    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(COLOR_BORDER));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_cells(frame, inner, app.session().renderer());

    match app.session().status() {
        GameStatus::Idle => render_start_menu(
            frame,
            board_area,
            app.name_input(),
            app.name_invalid(),
            app.message(),
        ),
        GameStatus::Paused => render_pause_menu(frame, board_area),
        GameStatus::Ended => render_game_over_menu(
            frame,
            board_area,
            app.session().last_result(),
            app.session().end_reason(),
        ),
        GameStatus::Running => {}
    }
}

/// Centres a bordered board of the view's size inside `area`, shrinking it
/// when the terminal is too small.
fn board_rect(area: Rect, view: &BoardView) -> Rect {
    let grid = view.grid();
    let width = grid
        .cols
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid.rows.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, view: &BoardView) {
    let grid = view.grid();
    let buffer = frame.buffer_mut();

    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let content = view.cell(Position::new(i32::from(x), i32::from(y)));
            let Some((glyph, style)) = cell_glyph(content) else {
                continue;
            };
            let Some((term_x, term_y)) = logical_to_terminal(inner, x, y) else {
                continue;
            };
            buffer.set_string(term_x, term_y, glyph, style);
        }
    }
}

fn cell_glyph(content: CellContent) -> Option<(&'static str, Style)> {
    match content {
        CellContent::Empty => None,
        CellContent::Food => Some((GLYPH_FOOD, Style::new().fg(COLOR_FOOD))),
        CellContent::Body => Some((GLYPH_SNAKE_BODY, Style::new().fg(COLOR_SNAKE_BODY))),
        CellContent::Head(direction) => Some((
            head_glyph(direction),
            Style::new()
                .fg(COLOR_SNAKE_HEAD)
                .add_modifier(Modifier::BOLD),
        )),
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, x: u16, y: u16) -> Option<(u16, u16)> {
    let term_x = inner.x.saturating_add(x.saturating_mul(CELL_WIDTH));
    let term_y = inner.y.saturating_add(y);
    if term_x.saturating_add(CELL_WIDTH) > inner.right() || term_y >= inner.bottom() {
        return None;
    }

    Some((term_x, term_y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{board_rect, logical_to_terminal};
    use crate::config::Grid;
    use crate::render::BoardView;

    #[test]
    fn board_is_centred_when_it_fits() {
        let view = BoardView::new(Grid::new(20, 13));

        let rect = board_rect(Rect::new(0, 0, 80, 30), &view);

        assert_eq!(rect, Rect::new(19, 7, 42, 15));
    }

    #[test]
    fn board_shrinks_to_small_terminals() {
        let view = BoardView::new(Grid::new(20, 13));

        let rect = board_rect(Rect::new(0, 0, 30, 10), &view);

        assert_eq!(rect, Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn cells_outside_the_inner_area_are_clipped() {
        let inner = Rect::new(1, 1, 10, 4);

        assert_eq!(logical_to_terminal(inner, 0, 0), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, 4, 3), Some((9, 4)));
        assert_eq!(logical_to_terminal(inner, 5, 0), None);
        assert_eq!(logical_to_terminal(inner, 0, 4), None);
    }
}
