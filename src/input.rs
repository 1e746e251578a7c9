use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(dx, dy)` step for one move; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// High-level input events consumed by the app loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Confirm,
    Dismiss,
    ClearHistory,
    Text(char),
    Backspace,
    Quit,
}

/// Whether printable keys edit text or act as game controls.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputMode {
    TextEntry,
    Play,
}

/// Maps one key event to a logical input. Releases and repeats are dropped.
#[must_use]
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(GameInput::Quit),
            KeyCode::Char('d') if mode == InputMode::TextEntry => Some(GameInput::ClearHistory),
            _ => None,
        };
    }

    let arrow = match key.code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = arrow {
        return Some(GameInput::Direction(direction));
    }

    match (mode, key.code) {
        (_, KeyCode::Enter) => Some(GameInput::Confirm),
        (_, KeyCode::Esc) => Some(GameInput::Dismiss),
        (InputMode::TextEntry, KeyCode::Backspace) => Some(GameInput::Backspace),
        (InputMode::TextEntry, KeyCode::Char(c)) => Some(GameInput::Text(c)),
        (InputMode::Play, KeyCode::Char(c)) => match c.to_ascii_lowercase() {
            'w' => Some(GameInput::Direction(Direction::Up)),
            's' => Some(GameInput::Direction(Direction::Down)),
            'a' => Some(GameInput::Direction(Direction::Left)),
            'd' => Some(GameInput::Direction(Direction::Right)),
            'p' | ' ' => Some(GameInput::Pause),
            'q' => Some(GameInput::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Waits up to `timeout` for a key and maps it.
pub fn poll_input(timeout: Duration, mode: InputMode) -> io::Result<Option<GameInput>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) => Ok(map_key(key, mode)),
        _ => Ok(None),
    }
}
