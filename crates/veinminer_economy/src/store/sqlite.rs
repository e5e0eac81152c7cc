//! SQLite statistics backend.
//!
//! Two tables, both named with a sanitized prefix:
//! `{prefix}player_stats` (one row per player) and
//! `{prefix}player_milestones` (one row per achieved threshold).

use super::{StatsRecord, StatsStore};
use crate::error::{StoreError, StoreResult};
use crate::stats::PlayerStats;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use veinminer_core::PlayerId;

/// Prefix used when the configured one sanitizes to nothing.
pub const DEFAULT_TABLE_PREFIX: &str = "veinminer_";

/// Longest accepted prefix.
pub const MAX_TABLE_PREFIX_LEN: usize = 32;

/// Keeps `[A-Za-z0-9_]`, truncates to 32 chars, falls back to the default.
#[must_use]
pub fn sanitize_table_prefix(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_TABLE_PREFIX_LEN)
        .collect();
    if cleaned.is_empty() {
        DEFAULT_TABLE_PREFIX.to_owned()
    } else {
        cleaned
    }
}

/// Statistics in SQLite.
pub struct SqliteStatsStore {
    conn: Mutex<Connection>,
    stats_table: String,
    milestones_table: String,
}

impl std::fmt::Debug for SqliteStatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStatsStore")
            .field("stats_table", &self.stats_table)
            .field("milestones_table", &self.milestones_table)
            .finish_non_exhaustive()
    }
}

impl SqliteStatsStore {
    /// Opens (or creates) the database and its tables.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the parent folder cannot be created, or a
    /// SQLite error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>, table_prefix: &str) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        Self::with_connection(Connection::open(path)?, table_prefix)
    }

    /// In-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// SQLite errors during setup.
    pub fn in_memory(table_prefix: &str) -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, table_prefix)
    }

    fn with_connection(conn: Connection, table_prefix: &str) -> StoreResult<Self> {
        let prefix = sanitize_table_prefix(table_prefix);
        let store = Self {
            stats_table: format!("{prefix}player_stats"),
            milestones_table: format!("{prefix}player_milestones"),
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {stats} (
                uuid TEXT PRIMARY KEY NOT NULL,
                total_veins INTEGER NOT NULL DEFAULT 0,
                total_blocks INTEGER NOT NULL DEFAULT 0,
                largest_vein INTEGER NOT NULL DEFAULT 0,
                last_mined INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS {milestones} (
                uuid TEXT NOT NULL,
                milestone INTEGER NOT NULL,
                PRIMARY KEY (uuid, milestone)
            );",
            stats = self.stats_table,
            milestones = self.milestones_table,
        ))?;
        Ok(())
    }

    /// Player stats table name.
    #[must_use]
    pub fn stats_table(&self) -> &str {
        &self.stats_table
    }

    /// Milestone table name.
    #[must_use]
    pub fn milestones_table(&self) -> &str {
        &self.milestones_table
    }
}

fn to_sql(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn from_sql(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

impl StatsStore for SqliteStatsStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load_all(&self) -> StoreResult<Vec<StatsRecord>> {
        let conn = self.conn.lock();

        let mut milestones: HashMap<String, Vec<u64>> = HashMap::new();
        let mut stmt = conn.prepare(&format!("SELECT uuid, milestone FROM {}", self.milestones_table))?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        for row in rows {
            let (uuid, m) = row?;
            milestones.entry(uuid).or_default().push(from_sql(m));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT uuid, total_veins, total_blocks, largest_vein, last_mined FROM {} ORDER BY uuid",
            self.stats_table
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                PlayerStats {
                    total_veins: from_sql(row.get(1)?),
                    total_blocks: from_sql(row.get(2)?),
                    largest_vein: from_sql(row.get(3)?),
                    last_mined_at: from_sql(row.get(4)?),
                    ..PlayerStats::default()
                },
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (uuid, mut stats) = row?;
            if let Some(ms) = milestones.remove(&uuid) {
                stats.achieved_milestones.extend(ms);
            }
            out.push(StatsRecord { player_id: PlayerId(uuid), stats });
        }
        Ok(out)
    }

    fn write(&self, records: &[StatsRecord]) -> StoreResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut upsert = tx.prepare(&format!(
                "INSERT INTO {} (uuid, total_veins, total_blocks, largest_vein, last_mined)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(uuid) DO UPDATE SET
                    total_veins = excluded.total_veins,
                    total_blocks = excluded.total_blocks,
                    largest_vein = excluded.largest_vein,
                    last_mined = excluded.last_mined,
                    updated_at = CURRENT_TIMESTAMP",
                self.stats_table
            ))?;
            let mut clear = tx.prepare(&format!("DELETE FROM {} WHERE uuid = ?1", self.milestones_table))?;
            let mut insert_ms =
                tx.prepare(&format!("INSERT INTO {} (uuid, milestone) VALUES (?1, ?2)", self.milestones_table))?;

            for r in records {
                let s = &r.stats;
                upsert.execute(params![
                    r.player_id.as_str(),
                    to_sql(s.total_veins),
                    to_sql(s.total_blocks),
                    to_sql(s.largest_vein),
                    to_sql(s.last_mined_at),
                ])?;
                clear.execute(params![r.player_id.as_str()])?;
                for &m in &s.achieved_milestones {
                    insert_ms.execute(params![r.player_id.as_str(), to_sql(m)])?;
                }
            }
        }
        tx.commit()?;
        tracing::debug!(count = records.len(), table = %self.stats_table, "statistics saved");
        Ok(())
    }
}
