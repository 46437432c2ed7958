use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::grid::GridSize;

const APP_DIR_NAME: &str = "grubsnake";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: u32 = 950;

/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: u32 = 600;

/// Edge length of one grid cell in pixels.
pub const CELL_SIZE: u32 = 30;

/// Render loop sleep between frames (~60 fps).
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Screen extent and cell size the grid is derived from.
///
/// Hazards leave the board by pixel extent, so the geometry travels with the
/// session rather than just the cell counts.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ScreenGeometry {
    pub width_px: u32,
    pub height_px: u32,
    pub cell_size: u32,
}

impl ScreenGeometry {
    /// Geometry whose pixel extent is exactly `grid` cells.
    #[must_use]
    pub fn from_grid(grid: GridSize, cell_size: u32) -> Self {
        Self {
            width_px: u32::from(grid.width) * cell_size,
            height_px: u32::from(grid.height) * cell_size,
            cell_size,
        }
    }

    #[must_use]
    pub fn grid(self) -> GridSize {
        GridSize::from_screen(self.width_px, self.height_px, self.cell_size)
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            width_px: SCREEN_WIDTH,
            height_px: SCREEN_HEIGHT,
            cell_size: CELL_SIZE,
        }
    }
}

/// Difficulty levels; `key()` is also the high-score table key.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

/// Tunables for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSettings {
    /// Milliseconds between simulation ticks.
    pub move_interval_ms: u64,
    pub poison_enabled: bool,
    pub poison_min: usize,
    pub poison_max: usize,
    pub hazards_enabled: bool,
    pub obstacle_width: u16,
    pub obstacle_height: u16,
    /// Minimum empty columns between two traps of one row.
    pub obstacle_gap: u16,
    /// Cells per tick; may be fractional.
    pub obstacle_speed: f32,
    /// Ticks between row spawns.
    pub obstacle_spawn_interval: u32,
}

impl LevelSettings {
    #[must_use]
    pub fn for_level(level: Difficulty) -> Self {
        let base = Self {
            move_interval_ms: 120,
            poison_enabled: false,
            poison_min: 5,
            poison_max: 9,
            hazards_enabled: false,
            obstacle_width: 2,
            obstacle_height: 2,
            obstacle_gap: 3,
            obstacle_speed: 0.1,
            obstacle_spawn_interval: 40,
        };

        match level {
            Difficulty::Easy => base,
            Difficulty::Medium => Self {
                move_interval_ms: 100,
                ..base
            },
            Difficulty::Hard => Self {
                move_interval_ms: 80,
                poison_enabled: true,
                hazards_enabled: true,
                ..base
            },
        }
    }

    fn apply(&mut self, patch: &LevelPatch) {
        if let Some(value) = patch.move_interval_ms {
            self.move_interval_ms = value.max(1);
        }
        if let Some(value) = patch.poison_enabled {
            self.poison_enabled = value;
        }
        if let Some(value) = patch.poison_min {
            self.poison_min = value;
        }
        if let Some(value) = patch.poison_max {
            self.poison_max = value;
        }
        if let Some(value) = patch.hazards_enabled {
            self.hazards_enabled = value;
        }
        if let Some(value) = patch.obstacle_width {
            self.obstacle_width = value.max(1);
        }
        if let Some(value) = patch.obstacle_height {
            self.obstacle_height = value.max(1);
        }
        if let Some(value) = patch.obstacle_gap {
            self.obstacle_gap = value;
        }
        if let Some(value) = patch.obstacle_speed {
            self.obstacle_speed = value.max(0.0);
        }
        if let Some(value) = patch.obstacle_spawn_interval {
            self.obstacle_spawn_interval = value;
        }

        if self.poison_max < self.poison_min {
            self.poison_max = self.poison_min;
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LevelPatch {
    move_interval_ms: Option<u64>,
    poison_enabled: Option<bool>,
    poison_min: Option<usize>,
    poison_max: Option<usize>,
    hazards_enabled: Option<bool>,
    obstacle_width: Option<u16>,
    obstacle_height: Option<u16>,
    obstacle_gap: Option<u16>,
    obstacle_speed: Option<f32>,
    obstacle_spawn_interval: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    easy: Option<LevelPatch>,
    medium: Option<LevelPatch>,
    hard: Option<LevelPatch>,
}

/// Settings for every level, after file overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    easy: LevelSettings,
    medium: LevelSettings,
    hard: LevelSettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            easy: LevelSettings::for_level(Difficulty::Easy),
            medium: LevelSettings::for_level(Difficulty::Medium),
            hard: LevelSettings::for_level(Difficulty::Hard),
        }
    }
}

impl GameSettings {
    #[must_use]
    pub fn level(&self, level: Difficulty) -> LevelSettings {
        match level {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Loads overrides from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is
    /// an error so the caller can warn before falling back.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: SettingsFile = serde_json::from_str(raw)?;
        let mut settings = Self::default();

        if let Some(patch) = &file.easy {
            settings.easy.apply(patch);
        }
        if let Some(patch) = &file.medium {
            settings.medium.apply(patch);
        }
        if let Some(patch) = &file.hard {
            settings.hard.apply(patch);
        }

        Ok(settings)
    }
}

/// Returns the platform-correct settings override path.
#[must_use]
pub fn settings_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    base
}

/// Directory for scores and logs.
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}
