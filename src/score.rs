use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::data_dir;
use crate::error::ScoreError;

const SCORE_FILE_NAME: &str = "score.txt";
const FIELD_SEPARATOR: char = ';';

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    data_dir().join(SCORE_FILE_NAME)
}

/// Per-level high scores in first-seen order.
///
/// On disk this is one `level;score` record per line. Lines with the wrong
/// field count or a non-numeric score count as 0 for their level; when a
/// level appears twice the first record wins.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HighScoreTable {
    entries: Vec<(String, u32)>,
}

impl HighScoreTable {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut table = Self::default();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            let level = fields[0].trim();
            if level.is_empty() || table.get(level).is_some() {
                continue;
            }

            let score = match fields.as_slice() {
                [_, score] => score.trim().parse::<u32>().unwrap_or(0),
                _ => 0,
            };
            table.entries.push((level.to_owned(), score));
        }

        table
    }

    #[must_use]
    pub fn get(&self, level: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, score)| *score)
    }

    /// Updates `level` in place or appends it.
    pub fn set(&mut self, level: &str, score: u32) {
        match self.entries.iter_mut().find(|(name, _)| name == level) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((level.to_owned(), score)),
        }
    }

    #[must_use]
    pub fn to_file_string(&self) -> String {
        self.entries
            .iter()
            .map(|(name, score)| format!("{name}{FIELD_SEPARATOR}{score}\n"))
            .collect()
    }
}

/// Where the high-score table lives.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum HighScoreStore {
    File(PathBuf),
    /// Session-only; nothing is written.
    Memory,
}

impl HighScoreStore {
    /// Reads the table. `Ok(None)` means no file yet.
    pub fn load(&self) -> Result<Option<HighScoreTable>, ScoreError> {
        match self {
            Self::File(path) => load_table_from_path(path),
            Self::Memory => Ok(None),
        }
    }

    /// Rewrites the whole table, creating parent directories when needed.
    pub fn save(&self, table: &HighScoreTable) -> Result<(), ScoreError> {
        match self {
            Self::File(path) => save_table_to_path(path, table),
            Self::Memory => Ok(()),
        }
    }
}

/// Undecodable bytes become replacement characters, so a damaged line reads
/// as a malformed record instead of failing the whole table.
fn load_table_from_path(path: &Path) -> Result<Option<HighScoreTable>, ScoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(HighScoreTable::parse(&String::from_utf8_lossy(&bytes)))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ScoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn save_table_to_path(path: &Path, table: &HighScoreTable) -> Result<(), ScoreError> {
    let io_error = |source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, table.to_file_string()).map_err(io_error)
}

/// Current score plus the persisted high score of the active level.
#[derive(Debug, Clone)]
pub struct Score {
    current: u32,
    high: u32,
    level: String,
    table: HighScoreTable,
    store: HighScoreStore,
}

impl Score {
    /// Loads the high score for `level`, adding a zero record (and writing
    /// it out) when the level is not in the table yet.
    ///
    /// An unreadable file is not fatal: the session continues with an
    /// in-memory table and never writes, so the file is left untouched.
    #[must_use]
    pub fn load(level: &str, store: HighScoreStore) -> Self {
        let (mut table, mut store) = match store.load() {
            Ok(table) => (table.unwrap_or_default(), store),
            Err(error) => {
                warn!("{error}; high scores are kept in memory for this session");
                (HighScoreTable::default(), HighScoreStore::Memory)
            }
        };

        let high = match table.get(level) {
            Some(high) => high,
            None => {
                table.set(level, 0);
                if let Err(error) = store.save(&table) {
                    warn!("{error}; high scores are kept in memory for this session");
                    store = HighScoreStore::Memory;
                }
                0
            }
        };

        Self {
            current: 0,
            high,
            level: level.to_owned(),
            table,
            store,
        }
    }

    /// Score that never touches the disk.
    #[must_use]
    pub fn in_memory(level: &str) -> Self {
        Self::load(level, HighScoreStore::Memory)
    }

    /// Adds `amount` (negative for penalties), clamping at zero.
    ///
    /// Returns true when this call raised the high score; the new value is
    /// written out before returning.
    pub fn add(&mut self, amount: i32) -> bool {
        let next = (i64::from(self.current) + i64::from(amount)).clamp(0, i64::from(u32::MAX));
        self.current = u32::try_from(next).unwrap_or(u32::MAX);

        if self.current <= self.high {
            return false;
        }

        self.high = self.current;
        self.table.set(&self.level, self.high);
        if let Err(error) = self.store.save(&self.table) {
            warn!("{error}; new high score {} not saved", self.high);
        } else {
            info!("new {} high score: {}", self.level, self.high);
        }
        true
    }

    /// Zeroes the current score; the high score stays.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn high(&self) -> u32 {
        self.high
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{HighScoreStore, HighScoreTable, Score};

    #[test]
    fn parse_keeps_order_and_zeroes_malformed_records() {
        let table = HighScoreTable::parse("easy;12\nhard;x\nmedium\n\nodd;1;2\n");

        assert_eq!(table.to_file_string(), "easy;12\nhard;0\nmedium;0\nodd;0\n");
    }

    #[test]
    fn first_record_wins_for_duplicate_levels() {
        let table = HighScoreTable::parse("easy;3\neasy;9\n");

        assert_eq!(table.get("easy"), Some(3));
        assert_eq!(table.to_file_string(), "easy;3\n");
    }

    #[test]
    fn set_updates_in_place() {
        let mut table = HighScoreTable::parse("easy;12\nhard;40\n");
        table.set("easy", 15);
        table.set("medium", 1);

        assert_eq!(table.to_file_string(), "easy;15\nhard;40\nmedium;1\n");
    }

    #[test]
    fn missing_level_is_appended_and_persisted() {
        let path = unique_test_path("append");
        write_fixture(&path, b"easy;12\nhard;40\n");

        let score = Score::load("medium", HighScoreStore::File(path.clone()));

        assert_eq!(score.high(), 0);
        let raw = fs::read_to_string(&path).expect("score file should exist");
        assert_eq!(raw, "easy;12\nhard;40\nmedium;0\n");
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_file_is_created_with_zero_record() {
        let path = unique_test_path("create");

        let score = Score::load("easy", HighScoreStore::File(path.clone()));

        assert_eq!(score.high(), 0);
        let raw = fs::read_to_string(&path).expect("score file should be created");
        assert_eq!(raw, "easy;0\n");
        cleanup_test_path(&path);
    }

    #[test]
    fn existing_level_is_loaded() {
        let path = unique_test_path("existing");
        write_fixture(&path, b"easy;12\nhard;40\n");

        let score = Score::load("hard", HighScoreStore::File(path.clone()));

        assert_eq!(score.high(), 40);
        assert_eq!(score.current(), 0);
        cleanup_test_path(&path);
    }

    #[test]
    fn beating_high_score_rewrites_file() {
        let path = unique_test_path("beat");
        write_fixture(&path, b"easy;12\nhard;2\n");
        let mut score = Score::load("hard", HighScoreStore::File(path.clone()));

        assert!(!score.add(2));
        assert!(score.add(1));

        let raw = fs::read_to_string(&path).expect("score file should exist");
        assert_eq!(raw, "easy;12\nhard;3\n");
        cleanup_test_path(&path);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let mut score = Score::in_memory("easy");
        score.add(2);

        score.add(-5);

        assert_eq!(score.current(), 0);
    }

    #[test]
    fn high_score_never_decreases() {
        let path = unique_test_path("monotonic");
        let mut score = Score::load("easy", HighScoreStore::File(path.clone()));
        let mut last_persisted = 0;

        for amount in [1, 1, -1, 3, -10, 2, 1, 1, 1, 1, 1, -2] {
            score.add(amount);
            let table = HighScoreStore::File(path.clone())
                .load()
                .expect("score file should be readable")
                .expect("score file should exist");
            let persisted = table.get("easy").expect("level is recorded");

            assert!(persisted >= last_persisted);
            assert_eq!(persisted, score.high());
            last_persisted = persisted;
        }

        assert_eq!(score.high(), 7);
        cleanup_test_path(&path);
    }

    #[test]
    fn reset_keeps_high_score() {
        let mut score = Score::in_memory("easy");
        score.add(4);

        score.reset();

        assert_eq!(score.current(), 0);
        assert_eq!(score.high(), 4);
    }

    #[test]
    fn unreadable_file_falls_back_to_memory() {
        // A directory at the file path makes reads fail with something other
        // than NotFound.
        let path = unique_test_path("unreadable");
        fs::create_dir_all(&path).expect("test directory should be creatable");

        let mut score = Score::load("easy", HighScoreStore::File(path.clone()));
        assert_eq!(score.high(), 0);
        assert!(score.add(3));
        assert_eq!(score.high(), 3);

        let _ = fs::remove_dir(&path);
    }

    #[test]
    fn undecodable_line_only_zeroes_its_own_record() {
        let path = unique_test_path("undecodable");
        write_fixture(&path, b"easy;12\nhard;40\n\xff\xfe;3\n");

        let easy = Score::load("easy", HighScoreStore::File(path.clone()));
        assert_eq!(easy.high(), 12);

        let mut hard = Score::load("hard", HighScoreStore::File(path.clone()));
        assert_eq!(hard.high(), 40);
        assert!(hard.add(41));

        let table = HighScoreStore::File(path.clone())
            .load()
            .expect("score file should be readable")
            .expect("score file should exist");
        assert_eq!(table.get("easy"), Some(12));
        assert_eq!(table.get("hard"), Some(41));
        cleanup_test_path(&path);
    }

    #[test]
    fn unwritable_location_falls_back_to_memory() {
        // A regular file where the parent directory should be makes both the
        // read and the write fail.
        let blocker = unique_test_path("blocker");
        write_fixture(&blocker, b"not a directory");
        let path = blocker.join("score.txt");

        let mut score = Score::load("hard", HighScoreStore::File(path.clone()));
        assert_eq!(score.high(), 0);
        assert!(score.add(2));
        assert!(!score.add(-1));
        assert!(score.add(2));
        assert_eq!(score.high(), 3);
        assert!(blocker.is_file());

        cleanup_test_path(&blocker);
    }

    #[test]
    fn failed_save_keeps_the_new_high_score() {
        let path = unique_test_path("failed-save");
        write_fixture(&path, b"easy;5\n");
        let mut score = Score::load("easy", HighScoreStore::File(path.clone()));
        assert_eq!(score.high(), 5);

        // Writes into a directory fail.
        fs::remove_file(&path).expect("fixture should be removable");
        fs::create_dir_all(&path).expect("test directory should be creatable");

        assert!(score.add(6));
        assert_eq!(score.high(), 6);
        assert!(!score.add(-2));
        assert_eq!(score.high(), 6);

        let _ = fs::remove_dir(&path);
    }

    fn write_fixture(path: &PathBuf, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grubsnake-score-tests")
            .join(format!("{label}-{nanos}.txt"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
    }
}
