use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use grubsnake::app::{App, AppConfig};
use grubsnake::config::{
    Difficulty, FRAME_INTERVAL_MS, GameSettings, ScreenGeometry, data_dir, settings_path,
};
use grubsnake::error::AppError;
use grubsnake::input::InputHandler;
use grubsnake::renderer;
use grubsnake::score::scores_path;
use grubsnake::terminal_runtime::TerminalSession;
use log::{error, info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

const LOG_FILE_NAME: &str = "grubsnake.log";

#[derive(Debug, Parser)]
#[command(version, about = "Grid snake for the terminal")]
struct Cli {
    /// Skip the menus and start this level.
    #[arg(long, value_enum)]
    level: Option<Difficulty>,

    /// Seed for apple, poison and trap placement.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (`level;score` per line).
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Level settings overrides (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir().join(LOG_FILE_NAME));
    if let Err(error) = init_logging(&log_path, cli.log_level.into()) {
        eprintln!("logging disabled: {}: {error}", log_path.display());
    }
    info!("starting grubsnake {}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => {
            info!("bye");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            eprintln!("grubsnake: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(path: &Path, level: LevelFilter) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file).map_err(std::io::Error::other)
}

fn load_settings(path: &Path) -> GameSettings {
    match GameSettings::load_from_path(path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("{err}; using built-in level settings");
            GameSettings::default()
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings_file = cli.config.unwrap_or_else(settings_path);
    let config = AppConfig {
        geometry: ScreenGeometry::default(),
        settings: load_settings(&settings_file),
        scores_file: Some(cli.scores_file.unwrap_or_else(scores_path)),
        seed: cli.seed,
    };

    let mut app = App::new(config, Instant::now());
    if let Some(level) = cli.level {
        app.start_level(level, Instant::now())?;
    }

    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let frame_interval = Duration::from_millis(FRAME_INTERVAL_MS);

    while !app.should_quit() {
        let now = Instant::now();
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &app, now))?;

        if let Some(game_input) = input.poll_input()? {
            app.handle_input(game_input, Instant::now())?;
        }
        app.update(Instant::now())?;

        thread::sleep(frame_interval);
    }

    Ok(())
}
