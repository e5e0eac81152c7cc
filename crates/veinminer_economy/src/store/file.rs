//! Flat TOML statistics file.
//!
//! One document, keyed by player id:
//!
//! ```toml
//! [players."069a79f4-44e9-4726-a5be-fca90e38aaf5"]
//! totalVeins = 12
//! totalBlocks = 140
//! largestVein = 31
//! lastMinedAt = 1760400000000
//! milestones = [100]
//! ```

use super::{StatsRecord, StatsStore};
use crate::error::{StoreError, StoreResult};
use crate::stats::PlayerStats;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use veinminer_core::PlayerId;

/// File name inside the data folder.
pub const STATS_FILE: &str = "stats.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsDocument {
    #[serde(default)]
    players: BTreeMap<String, PlayerStats>,
}

/// Statistics in a single TOML file.
#[derive(Debug)]
pub struct FileStatsStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl FileStatsStore {
    /// Store at an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), io: Mutex::new(()) }
    }

    /// Store at `<folder>/stats.toml`.
    #[must_use]
    pub fn in_folder(folder: impl AsRef<Path>) -> Self {
        Self::new(folder.as_ref().join(STATS_FILE))
    }

    /// File path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<StatsDocument> {
        match fs::read_to_string(&self.path) {
            Ok(text) => toml::from_str(&text).map_err(|source| StoreError::Decode {
                what: self.path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StatsDocument::default()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}

impl StatsStore for FileStatsStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn load_all(&self) -> StoreResult<Vec<StatsRecord>> {
        let _io = self.io.lock();
        let doc = self.read_document()?;
        Ok(doc
            .players
            .into_iter()
            .map(|(id, stats)| StatsRecord { player_id: PlayerId(id), stats })
            .collect())
    }

    fn write(&self, records: &[StatsRecord]) -> StoreResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let _io = self.io.lock();
        let mut doc = self.read_document()?;
        for r in records {
            doc.players.insert(r.player_id.0.clone(), r.stats.clone());
        }
        let text = toml::to_string(&doc)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::debug!(count = records.len(), path = %self.path.display(), "statistics saved");
        Ok(())
    }
}
