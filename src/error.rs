use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The allocator could not find any free cell.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum SpawnError {
    #[error("no free cell left on the {width}x{height} board")]
    BoardFull { width: u16, height: u16 },
}

/// High-score file could not be read or written.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Level settings override file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures that end the program.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}
