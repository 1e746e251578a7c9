use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use grid_snake::app::App;
use grid_snake::config::{
    APP_DIR_NAME, BoundaryMode, GameSettings, SettingsOverrides, default_settings_path,
    load_settings,
};
use grid_snake::game::GameSession;
use grid_snake::input::poll_input;
use grid_snake::ledger::{JsonFileStore, ResultsLedger};
use grid_snake::render::BoardView;
use grid_snake::renderer;
use grid_snake::terminal_runtime::TerminalSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "grid-snake.log";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file (JSON). Defaults to the platform config directory.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Results file (JSON). Defaults to the platform data directory.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Log file. Defaults to the platform data directory.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Initial snake length.
    #[arg(long = "snake-length")]
    snake_length: Option<usize>,

    /// Initial move interval in milliseconds.
    #[arg(long)]
    speed: Option<u64>,

    /// Move interval reduction per level in milliseconds.
    #[arg(long)]
    acceleration: Option<u64>,

    /// Smallest move interval in milliseconds.
    #[arg(long = "max-speed")]
    max_speed: Option<u64>,

    #[arg(long)]
    cols: Option<u16>,

    #[arg(long)]
    rows: Option<u16>,

    /// Maximum food items per batch.
    #[arg(long = "max-food")]
    max_food: Option<usize>,

    /// How the far edges of the grid are checked.
    #[arg(long, value_enum)]
    boundary: Option<BoundaryMode>,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            snake_length: self.snake_length,
            speed: self.speed,
            acceleration: self.acceleration,
            max_speed: self.max_speed,
            cols: self.cols,
            rows: self.rows,
            max_food: self.max_food,
            boundary: self.boundary,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone());

    let settings = resolve_settings(&cli)?;
    let ledger = open_ledger(cli.results.clone());
    info!(?settings, "session configured");

    let session = GameSession::new(settings, BoardView::new(settings.grid()), ledger);
    let mut app = App::new(session);

    run(&mut app)?;
    Ok(())
}

fn run(app: &mut App) -> io::Result<()> {
    let mut terminal = TerminalSession::enter()?;

    while !app.should_quit() {
        terminal
            .terminal_mut()
            .draw(|frame| renderer::render(frame, app))?;

        let timeout = app.poll_timeout(Instant::now());
        if let Some(input) = poll_input(timeout, app.input_mode())? {
            app.handle_input(input, Instant::now());
        }

        app.tick(Instant::now());
    }

    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<GameSettings, Box<dyn Error>> {
    let base = match cli.settings.clone().or_else(default_settings_path) {
        Some(path) => load_settings(&path)?,
        None => GameSettings::default(),
    };

    let settings = base.with_overrides(&cli.overrides());
    settings.validate()?;
    Ok(settings)
}

fn open_ledger(path: Option<PathBuf>) -> ResultsLedger {
    let Some(store) = path.map(JsonFileStore::new).or_else(JsonFileStore::at_default_path)
    else {
        eprintln!("No data directory available; results will not be saved.");
        return ResultsLedger::in_memory();
    };

    let location = store.path().display().to_string();
    match ResultsLedger::open(Box::new(store)) {
        Ok(ledger) => ledger,
        Err(error) => {
            eprintln!("Failed to load results from {location}: {error}");
            eprintln!("Results from this session will not be saved.");
            ResultsLedger::in_memory()
        }
    }
}

fn init_logging(path: Option<PathBuf>) {
    let Some(path) = path.or_else(default_log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join(APP_DIR_NAME).join(LOG_FILE_NAME))
}
