use crate::config::Grid;
use crate::food::FoodSet;
use crate::input::Direction;
use crate::snake::Position;

/// Presentation sink driven by the game session.
///
/// The session calls these synchronously from inside its own operations;
/// implementations must not call back into the session.
pub trait BoardRenderer {
    /// Erases the snake, and food too when `include_food` is set.
    fn clear_board(&mut self, include_food: bool);

    /// Draws the snake, tail first; the last segment is the head.
    fn paint_snake(&mut self, segments: &[Position], head_direction: Direction);

    /// Draws every food cell.
    fn paint_food(&mut self, food: &FoodSet);

    fn notify_level(&mut self, level: u32);

    fn notify_timer(&mut self, elapsed_secs: u64);

    fn notify_game_over(&mut self);
}

/// What one board cell currently shows.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CellContent {
    #[default]
    Empty,
    Food,
    Body,
    Head(Direction),
}

/// Retained cell model of the board plus the HUD counters.
///
/// Cells outside the grid are silently dropped.
#[derive(Debug, Clone)]
pub struct BoardView {
    grid: Grid,
    cells: Vec<CellContent>,
    level: u32,
    elapsed_secs: u64,
    game_over: bool,
}

impl BoardView {
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![CellContent::Empty; grid.cell_count()],
            level: 0,
            elapsed_secs: 0,
            game_over: false,
        }
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns the content at `position`, or `Empty` off the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> CellContent {
        self.index(position)
            .map_or(CellContent::Empty, |index| self.cells[index])
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Returns true while a game-over notice is pending.
    #[must_use]
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Hides the game-over notice.
    pub fn dismiss_game_over(&mut self) {
        self.game_over = false;
    }

    /// Counts cells showing `content`.
    #[must_use]
    pub fn count(&self, content: CellContent) -> usize {
        self.cells.iter().filter(|cell| **cell == content).count()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.grid.is_in_bounds(position) {
            return None;
        }
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        Some(y * usize::from(self.grid.cols) + x)
    }

    fn set(&mut self, position: Position, content: CellContent) {
        if let Some(index) = self.index(position) {
            self.cells[index] = content;
        }
    }
}

impl BoardRenderer for BoardView {
    fn clear_board(&mut self, include_food: bool) {
        for cell in &mut self.cells {
            let keep = !include_food && *cell == CellContent::Food;
            if !keep {
                *cell = CellContent::Empty;
            }
        }
    }

    fn paint_snake(&mut self, segments: &[Position], head_direction: Direction) {
        let Some((head, body)) = segments.split_last() else {
            return;
        };
        for segment in body {
            self.set(*segment, CellContent::Body);
        }
        self.set(*head, CellContent::Head(head_direction));
    }

    fn paint_food(&mut self, food: &FoodSet) {
        for position in food.iter() {
            self.set(*position, CellContent::Food);
        }
    }

    fn notify_level(&mut self, level: u32) {
        self.level = level;
    }

    fn notify_timer(&mut self, elapsed_secs: u64) {
        self.elapsed_secs = elapsed_secs;
    }

    fn notify_game_over(&mut self) {
        self.game_over = true;
    }
}
