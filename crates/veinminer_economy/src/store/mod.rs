//! # Statistics Stores
//!
//! Persistence for lifetime statistics. Two real backends plus a null
//! store, selected once at startup:
//!
//! ```text
//! storage = "sqlite" ──open ok──► SqliteStatsStore
//!        │                 └─fail─► save_to_file? ──yes──► FileStatsStore
//!        │                                         └─no───► NullStatsStore
//! storage = "file"  ──► save_to_file? ──yes──► FileStatsStore
//!                                    └─no───► NullStatsStore (memory only)
//! ```
//!
//! Store errors never reach a mining action. The auto-saver logs them and
//! retries on the next cycle.

mod autosave;
mod file;
mod sqlite;

pub use autosave::AutoSaver;
pub use file::FileStatsStore;
pub use sqlite::{sanitize_table_prefix, SqliteStatsStore, DEFAULT_TABLE_PREFIX};

use crate::error::StoreResult;
use crate::stats::PlayerStats;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use veinminer_core::PlayerId;

/// One player's persisted statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsRecord {
    /// Player.
    pub player_id: PlayerId,
    /// Stats.
    pub stats: PlayerStats,
}

impl From<(PlayerId, PlayerStats)> for StatsRecord {
    fn from((player_id, stats): (PlayerId, PlayerStats)) -> Self {
        Self { player_id, stats }
    }
}

/// A statistics backend.
pub trait StatsStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Loads every stored record.
    ///
    /// # Errors
    ///
    /// Backend-specific IO, decode or SQL errors.
    fn load_all(&self) -> StoreResult<Vec<StatsRecord>>;

    /// Upserts records.
    ///
    /// # Errors
    ///
    /// Backend-specific IO, encode or SQL errors.
    fn write(&self, records: &[StatsRecord]) -> StoreResult<()>;
}

/// Store that keeps nothing.
#[derive(Debug, Default)]
pub struct NullStatsStore {
    warned: AtomicBool,
}

impl StatsStore for NullStatsStore {
    fn name(&self) -> &'static str {
        "null"
    }

    fn load_all(&self) -> StoreResult<Vec<StatsRecord>> {
        Ok(Vec::new())
    }

    fn write(&self, records: &[StatsRecord]) -> StoreResult<()> {
        if !records.is_empty() && !self.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(count = records.len(), "statistics persistence disabled, dropping writes");
        }
        Ok(())
    }
}

/// Which backend to try first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageKind {
    /// Flat TOML file.
    #[default]
    File,
    /// SQLite database.
    Sqlite,
}

/// Store selection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Preferred backend.
    pub kind: StorageKind,
    /// Persist to the flat file. With `File` this off keeps statistics in
    /// memory only; with `Sqlite` it decides whether a failed open falls back
    /// to the file or to memory.
    pub save_to_file: bool,
    /// Folder for the flat file and relative database paths.
    pub data_folder: PathBuf,
    /// Database path. Relative paths resolve against `data_folder`.
    pub sqlite_path: PathBuf,
    /// Table name prefix, sanitized before use.
    pub table_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::File,
            save_to_file: true,
            data_folder: PathBuf::from("plugins/veinminer"),
            sqlite_path: PathBuf::from("veinminer.db"),
            table_prefix: DEFAULT_TABLE_PREFIX.to_owned(),
        }
    }
}

impl StoreConfig {
    /// Resolved database path.
    #[must_use]
    pub fn resolved_sqlite_path(&self) -> PathBuf {
        if self.sqlite_path.is_absolute() {
            self.sqlite_path.clone()
        } else {
            self.data_folder.join(&self.sqlite_path)
        }
    }
}

/// Opens the configured store, falling back instead of failing.
#[must_use]
pub fn open_store(config: &StoreConfig) -> Box<dyn StatsStore> {
    match config.kind {
        StorageKind::File if !config.save_to_file => {
            tracing::info!("statistics kept in memory only");
            Box::new(NullStatsStore::default())
        }
        StorageKind::File => Box::new(FileStatsStore::in_folder(&config.data_folder)),
        StorageKind::Sqlite => {
            let path = config.resolved_sqlite_path();
            match SqliteStatsStore::open(&path, &config.table_prefix) {
                Ok(store) => {
                    tracing::info!(path = %path.display(), "statistics stored in sqlite");
                    Box::new(store)
                }
                Err(e) if config.save_to_file => {
                    tracing::warn!(error = %e, "sqlite statistics unavailable, falling back to file storage");
                    Box::new(FileStatsStore::in_folder(&config.data_folder))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "sqlite statistics unavailable, statistics will not persist");
                    Box::new(NullStatsStore::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_store() {
        let s = NullStatsStore::default();
        let rec = StatsRecord { player_id: PlayerId::new("x"), stats: PlayerStats::default() };
        assert!(s.write(&[rec.clone()]).is_ok());
        assert!(s.write(&[rec]).is_ok());
        assert!(s.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_file_without_save_to_file_is_memory_only() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StoreConfig {
            kind: StorageKind::File,
            save_to_file: false,
            data_folder: dir.path().to_path_buf(),
            ..StoreConfig::default()
        };
        let store = open_store(&cfg);
        assert_eq!(store.name(), NullStatsStore::default().name());

        let rec = StatsRecord { player_id: PlayerId::new("m"), stats: PlayerStats::default() };
        store.write(&[rec]).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_with_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StoreConfig { data_folder: dir.path().to_path_buf(), ..StoreConfig::default() };
        assert_eq!(open_store(&cfg).name(), FileStatsStore::in_folder(dir.path()).name());
    }

    #[test]
    fn test_resolved_sqlite_path() {
        let cfg = StoreConfig { data_folder: PathBuf::from("/srv/data"), ..StoreConfig::default() };
        assert_eq!(cfg.resolved_sqlite_path(), PathBuf::from("/srv/data/veinminer.db"));

        let abs = StoreConfig { sqlite_path: PathBuf::from("/var/db/stats.db"), ..cfg };
        assert_eq!(abs.resolved_sqlite_path(), PathBuf::from("/var/db/stats.db"));
    }
}
