use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;

/// Cumulative answer counters for one question within one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStat {
    pub attempts: u32,
    pub correct: u32,
}

impl AnswerStat {
    pub fn new(attempts: u32, correct: u32) -> Self {
        Self { attempts, correct }
    }

    /// Observed accuracy in 0.0..=1.0, None before the first attempt
    pub fn accuracy(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.correct as f64 / self.attempts as f64)
        }
    }

    pub fn record(&mut self, is_correct: bool) {
        self.attempts += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    fn is_consistent(&self) -> bool {
        self.correct <= self.attempts
    }
}

/// Question id -> stats for a single category
pub type StatsMap = HashMap<String, AnswerStat>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error("failed to create stats directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Namespaced storage key for a category's stats
pub fn stats_key(category: &str) -> String {
    format!("stats:{category}")
}

/// Decode a stored stats blob. Anything unreadable degrades to an empty map and
/// entries claiming more correct answers than attempts are dropped.
pub fn decode_stats(key: &str, raw: &str) -> StatsMap {
    match serde_json::from_str::<StatsMap>(raw) {
        Ok(mut stats) => {
            let before = stats.len();
            stats.retain(|_, s| s.is_consistent());
            if stats.len() != before {
                log::warn!("dropped {} inconsistent entries under {key}", before - stats.len());
            }
            stats
        }
        Err(e) => {
            log::warn!("discarding corrupt stats under {key}: {e}");
            StatsMap::new()
        }
    }
}

/// Durable per-device record of answer accuracy, scoped by category
pub trait StatsStore {
    /// Stats for a category; empty when nothing is stored or the stored data is corrupt
    fn load(&self, category: &str) -> StatsMap;

    /// Persist the full map for a category, replacing what was there
    fn save(&mut self, category: &str, stats: &StatsMap) -> Result<(), StatsError>;

    /// Count one answer and persist immediately
    fn record(
        &mut self,
        category: &str,
        question_id: &str,
        is_correct: bool,
    ) -> Result<AnswerStat, StatsError> {
        let mut stats = self.load(category);
        let stat = stats.entry(question_id.to_string()).or_default();
        stat.record(is_correct);
        let updated = *stat;
        self.save(category, &stats)?;
        Ok(updated)
    }
}

/// SQLite-backed stats store holding one JSON document per category
#[derive(Debug)]
pub struct SqliteStatsStore {
    conn: Connection,
}

impl SqliteStatsStore {
    /// Open the store at the default state directory
    pub fn new() -> Result<Self, StatsError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("sheetquiz_stats.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("opening stats database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StatsError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StatsError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS answer_stats (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(SqliteStatsStore { conn })
    }

    fn read_raw(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM answer_stats WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Store a raw value under a key, bypassing serialization
    pub fn write_raw(&self, key: &str, value: &str) -> Result<(), StatsError> {
        self.conn.execute(
            r#"
            INSERT INTO answer_stats (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Forget everything recorded for a category
    pub fn clear(&self, category: &str) -> Result<(), StatsError> {
        self.conn.execute(
            "DELETE FROM answer_stats WHERE key = ?1",
            [stats_key(category)],
        )?;
        Ok(())
    }
}

impl StatsStore for SqliteStatsStore {
    fn load(&self, category: &str) -> StatsMap {
        let key = stats_key(category);
        match self.read_raw(&key) {
            Ok(Some(raw)) => decode_stats(&key, &raw),
            Ok(None) => StatsMap::new(),
            Err(e) => {
                log::warn!("failed to read stats under {key}: {e}");
                StatsMap::new()
            }
        }
    }

    fn save(&mut self, category: &str, stats: &StatsMap) -> Result<(), StatsError> {
        let value = serde_json::to_string(stats)?;
        self.write_raw(&stats_key(category), &value)
    }
}

/// Volatile stats store; keeps serialized documents so it decodes like the durable one
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    entries: HashMap<String, String>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self, category: &str) -> StatsMap {
        let key = stats_key(category);
        self.entries
            .get(&key)
            .map(|raw| decode_stats(&key, raw))
            .unwrap_or_default()
    }

    fn save(&mut self, category: &str, stats: &StatsMap) -> Result<(), StatsError> {
        let value = serde_json::to_string(stats)?;
        self.entries.insert(stats_key(category), value);
        Ok(())
    }
}
