use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snake::Position;

/// Directory name used under the platform config and data dirs.
pub const APP_DIR_NAME: &str = "grid-snake";

const SETTINGS_FILE_NAME: &str = "settings.json";

/// Default initial body length.
pub const DEFAULT_SNAKE_LENGTH: usize = 6;

/// Default move interval in milliseconds.
pub const DEFAULT_SPEED_MS: u64 = 500;

/// Default interval reduction per level in milliseconds.
pub const DEFAULT_ACCELERATION_MS: u64 = 20;

/// Default interval floor in milliseconds.
pub const DEFAULT_MAX_SPEED_MS: u64 = 200;

pub const DEFAULT_COLS: u16 = 20;
pub const DEFAULT_ROWS: u16 = 13;

/// Default upper bound for one food batch.
pub const DEFAULT_MAX_FOOD: usize = 5;

/// Interval of the elapsed-time trigger.
pub const TIMER_INTERVAL: Duration = Duration::from_secs(1);

/// How the movement step treats the grid edge.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Any head outside `0..cols` x `0..rows` loses.
    #[default]
    Strict,
    /// Legacy edge check: the head may step one column or row past the far
    /// edges. The move after that must bring it back onto the grid.
    Overhang,
}

/// Fixed play-field dimensions for one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    pub cols: u16,
    pub rows: u16,
}

impl Grid {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Returns true when `position` is a visible cell.
    #[must_use]
    pub fn is_in_bounds(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < i32::from(self.cols)
            && position.y < i32::from(self.rows)
    }

    /// Returns true when a head moving from `from` to `to` survives the edge
    /// check.
    #[must_use]
    pub fn admits_move(self, from: Position, to: Position, mode: BoundaryMode) -> bool {
        if self.is_in_bounds(to) {
            return true;
        }
        match mode {
            BoundaryMode::Strict => false,
            BoundaryMode::Overhang => self.is_in_bounds(from) && self.is_overhang(to),
        }
    }

    /// Cells one column right of or one row below the visible grid.
    fn is_overhang(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x <= i32::from(self.cols)
            && position.y <= i32::from(self.rows)
            && !self.is_in_bounds(position)
    }

    /// Returns the total number of visible cells.
    #[must_use]
    pub fn cell_count(self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }
}

/// Session-scoped game settings.
///
/// Field names follow the settings file keys. `max_speed` is the smallest
/// move interval reachable through acceleration.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameSettings {
    pub snake_length: usize,
    pub speed: u64,
    pub acceleration: u64,
    pub max_speed: u64,
    pub cols: u16,
    pub rows: u16,
    pub max_food: usize,
    pub boundary: BoundaryMode,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            snake_length: DEFAULT_SNAKE_LENGTH,
            speed: DEFAULT_SPEED_MS,
            acceleration: DEFAULT_ACCELERATION_MS,
            max_speed: DEFAULT_MAX_SPEED_MS,
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            max_food: DEFAULT_MAX_FOOD,
            boundary: BoundaryMode::default(),
        }
    }
}

impl GameSettings {
    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(self.cols, self.rows)
    }

    /// Checks that every option has a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snake_length == 0 {
            return Err(invalid("snake_length", "must be at least 1"));
        }
        if self.speed == 0 {
            return Err(invalid("speed", "must be a positive number of milliseconds"));
        }
        if self.max_speed == 0 {
            return Err(invalid(
                "max_speed",
                "must be a positive number of milliseconds",
            ));
        }
        if self.max_speed > self.speed {
            return Err(invalid(
                "max_speed",
                format!("floor {} ms is slower than base speed {} ms", self.max_speed, self.speed),
            ));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(invalid("cols/rows", "grid needs at least one cell"));
        }
        let cells = self.grid().cell_count();
        if self.snake_length > cells {
            return Err(invalid(
                "snake_length",
                format!("{} segments do not fit on {cells} cells", self.snake_length),
            ));
        }
        if self.max_food == 0 {
            return Err(invalid("max_food", "must be at least 1"));
        }
        if self.max_food > cells {
            return Err(invalid(
                "max_food",
                format!("batch of {} exceeds {cells} cells", self.max_food),
            ));
        }
        Ok(())
    }

    /// Applies explicit per-field overrides on top of these settings.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(value) = overrides.snake_length {
            self.snake_length = value;
        }
        if let Some(value) = overrides.speed {
            self.speed = value;
        }
        if let Some(value) = overrides.acceleration {
            self.acceleration = value;
        }
        if let Some(value) = overrides.max_speed {
            self.max_speed = value;
        }
        if let Some(value) = overrides.cols {
            self.cols = value;
        }
        if let Some(value) = overrides.rows {
            self.rows = value;
        }
        if let Some(value) = overrides.max_food {
            self.max_food = value;
        }
        if let Some(value) = overrides.boundary {
            self.boundary = value;
        }
        self
    }
}

/// Optional replacements for individual settings, typically from the CLI.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SettingsOverrides {
    pub snake_length: Option<usize>,
    pub speed: Option<u64>,
    pub acceleration: Option<u64>,
    pub max_speed: Option<u64>,
    pub cols: Option<u16>,
    pub rows: Option<u16>,
    pub max_food: Option<usize>,
    pub boundary: Option<BoundaryMode>,
}

/// Returns the platform-correct default settings file path.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// Loads settings from `path`.
///
/// Returns defaults when the file does not exist. A file that exists but
/// cannot be read, parsed, or validated is an error.
pub fn load_settings(path: &Path) -> Result<GameSettings, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(GameSettings::default()),
        Err(e) => return Err(e.into()),
    };

    let settings: GameSettings = serde_json::from_str(&raw)?;
    settings.validate()?;
    Ok(settings)
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
