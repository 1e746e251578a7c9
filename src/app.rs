use std::time::{Duration, Instant};

use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::error::GameError;
use crate::game::{GameSession, GameStatus};
use crate::input::{GameInput, InputMode};
use crate::render::BoardView;

/// Longest accepted player name, in terminal columns.
pub const MAX_NAME_WIDTH: usize = 16;

/// Upper bound on how long the loop waits for input between redraws.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive wrapper around one [`GameSession`]: the name field, the
/// game-over notice and quit handling.
#[derive(Debug)]
pub struct App {
    session: GameSession<BoardView>,
    name_input: String,
    name_invalid: bool,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(session: GameSession<BoardView>) -> Self {
        Self {
            session,
            name_input: String::new(),
            name_invalid: false,
            message: None,
            should_quit: false,
        }
    }

    /// How keys should be read in the current state.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match self.session.status() {
            GameStatus::Idle => InputMode::TextEntry,
            GameStatus::Running | GameStatus::Paused | GameStatus::Ended => InputMode::Play,
        }
    }

    /// Applies one input at `now`.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) {
        if input == GameInput::Quit {
            self.should_quit = true;
            return;
        }

        match self.session.status() {
            GameStatus::Idle => self.handle_name_entry(input, now),
            GameStatus::Running | GameStatus::Paused => match input {
                GameInput::Direction(direction) => self.session.set_direction(direction),
                GameInput::Pause => self.session.toggle_pause(now),
                _ => {}
            },
            GameStatus::Ended => {
                if matches!(input, GameInput::Confirm | GameInput::Dismiss) {
                    self.session.acknowledge_game_over();
                    self.session.renderer_mut().dismiss_game_over();
                }
            }
        }
    }

    /// Runs every clock event due at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.session.advance(now);
    }

    /// Time the loop may block on input before the next clock event or frame.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.session
            .next_deadline()
            .map_or(FRAME_INTERVAL, |deadline| {
                deadline.saturating_duration_since(now).min(FRAME_INTERVAL)
            })
    }

    fn handle_name_entry(&mut self, input: GameInput, now: Instant) {
        match input {
            GameInput::Text(c) if !c.is_control() => {
                let mut candidate = self.name_input.clone();
                candidate.push(c);
                if candidate.width() <= MAX_NAME_WIDTH {
                    self.name_input = candidate;
                }
                self.name_invalid = false;
            }
            GameInput::Backspace => {
                self.name_input.pop();
            }
            GameInput::Confirm => match self.session.start(&self.name_input, now) {
                Ok(()) => {
                    self.name_invalid = false;
                    self.message = None;
                }
                Err(GameError::EmptyPlayerName) => self.name_invalid = true,
                Err(error) => {
                    warn!(%error, "could not start game");
                    self.message = Some(error.to_string());
                }
            },
            GameInput::ClearHistory => match self.session.clear_results() {
                Ok(()) => self.message = Some("Results cleared".to_owned()),
                Err(error) => {
                    warn!(%error, "could not clear results");
                    self.message = Some(error.to_string());
                }
            },
            GameInput::Dismiss => self.should_quit = true,
            _ => {}
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession<BoardView> {
        &self.session
    }

    #[must_use]
    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    #[must_use]
    pub fn name_invalid(&self) -> bool {
        self.name_invalid
    }

    /// Status line for the start screen, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::config::GameSettings;
    use crate::game::{GameSession, GameStatus};
    use crate::input::{Direction, GameInput, InputMode};
    use crate::ledger::{MemoryStore, ResultEntry, ResultsLedger};
    use crate::render::BoardView;

    use super::{App, FRAME_INTERVAL, MAX_NAME_WIDTH};

    fn app() -> App {
        let settings = GameSettings::default();
        let ledger = ResultsLedger::open(Box::new(MemoryStore::with_entries(vec![ResultEntry {
            player_name: "old".to_owned(),
            level: 2,
            elapsed_secs: 30,
        }])))
        .expect("memory store loads");
        App::new(GameSession::new_with_seed(
            settings,
            BoardView::new(settings.grid()),
            ledger,
            9,
        ))
    }

    fn type_name(app: &mut App, name: &str, now: Instant) {
        for c in name.chars() {
            app.handle_input(GameInput::Text(c), now);
        }
    }

    #[test]
    fn confirming_an_empty_name_marks_it_invalid() {
        let mut app = app();

        app.handle_input(GameInput::Confirm, Instant::now());

        assert!(app.name_invalid());
        assert_eq!(app.session().status(), GameStatus::Idle);
        assert_eq!(app.input_mode(), InputMode::TextEntry);
    }

    #[test]
    fn typing_clears_the_invalid_mark_and_starts() {
        let mut app = app();
        let now = Instant::now();
        app.handle_input(GameInput::Confirm, now);

        type_name(&mut app, "ada", now);
        app.handle_input(GameInput::Confirm, now);

        assert!(!app.name_invalid());
        assert_eq!(app.session().status(), GameStatus::Running);
        assert_eq!(app.session().player_name(), "ada");
        assert_eq!(app.input_mode(), InputMode::Play);
    }

    #[test]
    fn names_are_capped_in_width() {
        let mut app = app();

        type_name(&mut app, &"x".repeat(MAX_NAME_WIDTH + 4), Instant::now());
        app.handle_input(GameInput::Backspace, Instant::now());

        assert_eq!(app.name_input().len(), MAX_NAME_WIDTH - 1);
    }

    #[test]
    fn loss_notice_is_dismissed_back_to_name_entry() {
        let mut app = app();
        let now = Instant::now();
        type_name(&mut app, "ada", now);
        app.handle_input(GameInput::Confirm, now);
        app.handle_input(GameInput::Direction(Direction::Left), now);
        app.tick(now + Duration::from_millis(500));
        assert_eq!(app.session().status(), GameStatus::Ended);
        assert!(app.session().renderer().game_over());

        app.handle_input(GameInput::Dismiss, now + Duration::from_millis(600));

        assert_eq!(app.session().status(), GameStatus::Idle);
        assert!(!app.session().renderer().game_over());
        assert_eq!(app.name_input(), "ada");
        assert_eq!(app.session().ledger().len(), 2);
    }

    #[test]
    fn clear_history_empties_the_table() {
        let mut app = app();

        app.handle_input(GameInput::ClearHistory, Instant::now());

        assert!(app.session().ledger().is_empty());
        assert_eq!(app.message(), Some("Results cleared"));
    }

    #[test]
    fn pause_key_toggles() {
        let mut app = app();
        let now = Instant::now();
        type_name(&mut app, "ada", now);
        app.handle_input(GameInput::Confirm, now);

        app.handle_input(GameInput::Pause, now);
        assert_eq!(app.session().status(), GameStatus::Paused);

        app.handle_input(GameInput::Pause, now);
        assert_eq!(app.session().status(), GameStatus::Running);
    }

    #[test]
    fn quit_works_everywhere() {
        let mut app = app();

        app.handle_input(GameInput::Quit, Instant::now());

        assert!(app.should_quit());
    }

    #[test]
    fn poll_timeout_never_exceeds_a_frame() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.poll_timeout(now), FRAME_INTERVAL);

        type_name(&mut app, "ada", now);
        app.handle_input(GameInput::Confirm, now);

        assert_eq!(
            app.poll_timeout(now + Duration::from_millis(495)),
            Duration::from_millis(5)
        );
    }
}
