use std::collections::BTreeSet;

use rand::Rng;

use crate::config::Grid;
use crate::error::SpawnError;
use crate::snake::{Position, Snake};

/// Resampling budget per visible cell before a spawn gives up.
const SPAWN_ATTEMPTS_PER_CELL: usize = 64;

/// Food cells currently on the board.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FoodSet {
    cells: BTreeSet<Position>,
}

impl FoodSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `position`; placing food on a cell that already has food is a no-op.
    pub fn insert(&mut self, position: Position) {
        self.cells.insert(position);
    }

    /// Removes the food at `position`, returning whether there was any.
    pub fn take(&mut self, position: Position) -> bool {
        self.cells.remove(&position)
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }
}

impl Extend<Position> for FoodSet {
    fn extend<T: IntoIterator<Item = Position>>(&mut self, iter: T) {
        self.cells.extend(iter);
    }
}

/// Picks between 1 and `max_count` food cells at random, never on the snake.
///
/// `max_count` is capped at the number of visible cells. Samples are not
/// checked against existing food, so the result may repeat a cell. Fails fast
/// when the snake covers every visible cell and gives up after a bounded
/// number of samples that landed on the snake.
pub fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    max_count: usize,
    snake: &Snake,
    grid: Grid,
) -> Result<Vec<Position>, SpawnError> {
    let free_cells = grid.cell_count().saturating_sub(visible_segments(snake, grid));
    if free_cells == 0 {
        return Err(SpawnError::DegenerateSpawn {
            free_cells,
            attempts: 0,
        });
    }

    let count = rng.gen_range(1..=max_count.clamp(1, grid.cell_count()));
    let budget = grid.cell_count().saturating_mul(SPAWN_ATTEMPTS_PER_CELL);
    let mut rejected = 0;
    let mut placed = Vec::new();

    while placed.len() < count {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(grid.cols)),
            y: rng.gen_range(0..i32::from(grid.rows)),
        };
        if !snake.contains(candidate) {
            placed.push(candidate);
            continue;
        }

        rejected += 1;
        if rejected == budget {
            return Err(SpawnError::DegenerateSpawn {
                free_cells,
                attempts: rejected,
            });
        }
    }

    Ok(placed)
}

fn visible_segments(snake: &Snake, grid: Grid) -> usize {
    let visible: BTreeSet<&Position> = snake
        .segments()
        .filter(|segment| grid.is_in_bounds(**segment))
        .collect();
    visible.len()
}
