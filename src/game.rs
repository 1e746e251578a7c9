use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::{ClockEvent, GameClock};
use crate::config::{GameSettings, Grid};
use crate::error::{GameError, LedgerError};
use crate::food::{self, FoodSet};
use crate::input::{Direction, direction_change_is_valid};
use crate::ledger::{ResultEntry, ResultsLedger};
use crate::render::BoardRenderer;
use crate::snake::{Position, Snake};

/// Direction the snake faces after every reset.
pub const INITIAL_DIRECTION: Direction = Direction::Down;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Idle,
    Running,
    Paused,
    /// The last game was lost and its notice has not been acknowledged.
    Ended,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell and no new food fits.
    BoardFilled,
}

/// Result of one move.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    Moved,
    Ate { level: u32 },
    Ended(EndReason),
}

/// One player's game: board, snake, food, counters, clock, and results.
///
/// Every state transition goes through this type. Presentation is delegated
/// to the [`BoardRenderer`] it owns.
#[derive(Debug)]
pub struct GameSession<R: BoardRenderer> {
    settings: GameSettings,
    grid: Grid,
    renderer: R,
    ledger: ResultsLedger,
    snake: Option<Snake>,
    food: FoodSet,
    status: GameStatus,
    player_name: String,
    level: u32,
    elapsed_secs: u64,
    speed_ms: u64,
    direction: Direction,
    pending_direction: Option<Direction>,
    clock: GameClock,
    end_reason: Option<EndReason>,
    last_result: Option<ResultEntry>,
    rng: StdRng,
}

impl<R: BoardRenderer> GameSession<R> {
    /// Creates an idle session with an entropy-seeded food generator.
    #[must_use]
    pub fn new(settings: GameSettings, renderer: R, ledger: ResultsLedger) -> Self {
        Self::with_rng(settings, renderer, ledger, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(
        settings: GameSettings,
        renderer: R,
        ledger: ResultsLedger,
        seed: u64,
    ) -> Self {
        Self::with_rng(settings, renderer, ledger, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: GameSettings, renderer: R, ledger: ResultsLedger, rng: StdRng) -> Self {
        Self {
            settings,
            grid: settings.grid(),
            renderer,
            ledger,
            snake: None,
            food: FoodSet::new(),
            status: GameStatus::Idle,
            player_name: String::new(),
            level: 0,
            elapsed_secs: 0,
            speed_ms: settings.speed,
            direction: INITIAL_DIRECTION,
            pending_direction: None,
            clock: GameClock::new(Duration::from_millis(settings.speed)),
            end_reason: None,
            last_result: None,
            rng,
        }
    }

    /// Starts a new game for `player_name` with both clock triggers armed
    /// from `now`.
    ///
    /// An empty (or blank) name fails with [`GameError::EmptyPlayerName`]
    /// and leaves the session untouched.
    pub fn start(&mut self, player_name: &str, now: Instant) -> Result<(), GameError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }

        let column = i32::from(self.grid.cols.div_ceil(2));
        let snake = Snake::spawn_above(column, self.settings.snake_length);
        let cells = food::spawn(&mut self.rng, self.settings.max_food, &snake, self.grid)?;

        self.reset();
        player_name.clone_into(&mut self.player_name);
        self.snake = Some(snake);
        self.food.extend(cells);
        self.renderer.paint_food(&self.food);
        self.clock.start(now);
        self.status = GameStatus::Running;

        info!(
            player = %self.player_name,
            cols = self.grid.cols,
            rows = self.grid.rows,
            food = self.food.len(),
            "game started"
        );
        Ok(())
    }

    /// Dispatches every clock event due at `now`, in deadline order.
    ///
    /// Returns the outcome of each move performed.
    pub fn advance(&mut self, now: Instant) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();

        while self.status == GameStatus::Running {
            let Some((event, at)) = self.clock.next_due(now) else {
                break;
            };

            match event {
                ClockEvent::Move => outcomes.extend(self.step(at)),
                ClockEvent::Second => self.timer_tick(),
            }
        }

        outcomes
    }

    /// Performs one move as if the move trigger fired at `at`.
    ///
    /// Does nothing unless the game is running.
    pub fn step(&mut self, at: Instant) -> Option<StepOutcome> {
        if self.status != GameStatus::Running {
            return None;
        }
        let snake = self.snake.as_ref()?;

        self.renderer.clear_board(false);

        if let Some(next) = self.pending_direction.take() {
            self.direction = next;
        }
        let new_head = snake.peek_next_head(self.direction);

        let self_hit = snake.contains(new_head);
        let out_of_bounds = !self
            .grid
            .admits_move(snake.head(), new_head, self.settings.boundary);
        if self_hit || out_of_bounds {
            let reason = if self_hit {
                EndReason::SelfCollision
            } else {
                EndReason::WallCollision
            };
            self.end(reason);
            return Some(StepOutcome::Ended(reason));
        }

        let grew = self.food.take(new_head);
        if let Some(snake) = self.snake.as_mut() {
            snake.advance(new_head, grew);
        }
        self.paint_snake();

        if grew {
            Some(self.level_up(at))
        } else {
            Some(StepOutcome::Moved)
        }
    }

    /// Buffers `requested` for the next move unless it reverses the current
    /// direction. Ignored unless the game is running.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.status != GameStatus::Running {
            return;
        }
        if direction_change_is_valid(self.direction, requested) {
            self.pending_direction = Some(requested);
        }
    }

    /// Freezes a running game. No-op in any other state.
    pub fn pause(&mut self) {
        if self.status != GameStatus::Running {
            return;
        }
        self.clock.stop();
        self.status = GameStatus::Paused;
        debug!(elapsed_secs = self.elapsed_secs, "game paused");
    }

    /// Resumes a paused game, re-arming both triggers with full intervals
    /// from `now`. No-op in any other state.
    pub fn resume(&mut self, now: Instant) {
        if self.status != GameStatus::Paused {
            return;
        }
        self.clock.start(now);
        self.status = GameStatus::Running;
        debug!(elapsed_secs = self.elapsed_secs, "game resumed");
    }

    /// Pauses a running game or resumes a paused one.
    pub fn toggle_pause(&mut self, now: Instant) {
        match self.status {
            GameStatus::Running => self.pause(),
            GameStatus::Paused => self.resume(now),
            GameStatus::Idle | GameStatus::Ended => {}
        }
    }

    /// Clears the board and every counter and stops the clock.
    ///
    /// The results ledger is left alone.
    pub fn reset(&mut self) {
        self.renderer.clear_board(true);
        self.clock.stop();
        self.clock
            .reset_move_interval(Duration::from_millis(self.settings.speed));

        self.snake = None;
        self.food.clear();
        self.level = 0;
        self.elapsed_secs = 0;
        self.speed_ms = self.settings.speed;
        self.direction = INITIAL_DIRECTION;
        self.pending_direction = None;
        self.end_reason = None;
        self.last_result = None;
        self.status = GameStatus::Idle;

        self.renderer.notify_timer(0);
        self.renderer.notify_level(0);
    }

    /// Dismisses the game-over state, returning to idle.
    pub fn acknowledge_game_over(&mut self) {
        if self.status == GameStatus::Ended {
            self.status = GameStatus::Idle;
        }
    }

    /// Empties the results table and its backing store.
    pub fn clear_results(&mut self) -> Result<(), LedgerError> {
        self.ledger.clear()?;
        info!("results history cleared");
        Ok(())
    }

    fn timer_tick(&mut self) {
        self.elapsed_secs += 1;
        self.renderer.notify_timer(self.elapsed_secs);
    }

    fn level_up(&mut self, at: Instant) -> StepOutcome {
        self.level += 1;
        self.renderer.notify_level(self.level);

        if self.food.is_empty() {
            let snake = self.snake.as_ref();
            let spawned = snake.map(|snake| {
                food::spawn(&mut self.rng, self.settings.max_food, snake, self.grid)
            });
            match spawned {
                Some(Ok(cells)) => {
                    self.food.extend(cells);
                    self.renderer.paint_food(&self.food);
                    debug!(food = self.food.len(), "food respawned");
                }
                Some(Err(error)) => {
                    warn!(%error, "no room left for food");
                    self.end(EndReason::BoardFilled);
                    return StepOutcome::Ended(EndReason::BoardFilled);
                }
                None => {}
            }
        }

        self.speed_ms = self
            .speed_ms
            .saturating_sub(self.settings.acceleration)
            .max(self.settings.max_speed);
        self.clock
            .set_move_interval(Duration::from_millis(self.speed_ms), at);
        debug!(level = self.level, speed_ms = self.speed_ms, "level up");

        StepOutcome::Ate { level: self.level }
    }

    fn end(&mut self, reason: EndReason) {
        self.clock.stop();

        let entry = ResultEntry {
            player_name: self.player_name.clone(),
            level: self.level,
            elapsed_secs: self.elapsed_secs,
        };
        info!(
            player = %entry.player_name,
            level = entry.level,
            elapsed_secs = entry.elapsed_secs,
            ?reason,
            "game over"
        );
        if let Err(error) = self.ledger.record(entry.clone()) {
            warn!(%error, "failed to persist game result");
        }

        self.renderer.notify_game_over();
        self.reset();
        self.status = GameStatus::Ended;
        self.end_reason = Some(reason);
        self.last_result = Some(entry);
    }

    fn paint_snake(&mut self) {
        if let Some(snake) = &self.snake {
            let segments: Vec<Position> = snake.segments().copied().collect();
            self.renderer.paint_snake(&segments, self.direction);
        }
    }

    /// Replaces the snake body, e.g. to stage a scenario. Ignored unless a
    /// game is in progress.
    pub fn replace_snake(&mut self, snake: Snake) {
        if matches!(self.status, GameStatus::Running | GameStatus::Paused) {
            self.snake = Some(snake);
        }
    }

    /// Mutable access to the food cells, e.g. to stage a scenario.
    pub fn food_mut(&mut self) -> &mut FoodSet {
        &mut self.food
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn snake(&self) -> Option<&Snake> {
        self.snake.as_ref()
    }

    #[must_use]
    pub fn food(&self) -> &FoodSet {
        &self.food
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Current move interval in milliseconds.
    #[must_use]
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Direction committed by the last move.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction the next move will take.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.pending_direction.unwrap_or(self.direction)
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Entry recorded for the last finished game, until the next reset.
    #[must_use]
    pub fn last_result(&self) -> Option<&ResultEntry> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Earliest instant at which [`Self::advance`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    #[must_use]
    pub fn ledger(&self) -> &ResultsLedger {
        &self.ledger
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
