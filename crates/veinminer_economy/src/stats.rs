//! # Lifetime Statistics
//!
//! Per-player counters updated once per vein action, with milestone
//! crossings reported exactly once per player.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use veinminer_core::{KeyedStore, Millis, PlayerId};

/// Default milestone thresholds.
pub const DEFAULT_MILESTONES: [u64; 5] = [100, 500, 1000, 5000, 10_000];

/// Counter the milestones are measured on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneBasis {
    /// Lifetime blocks mined.
    #[default]
    TotalBlocks,
    /// Lifetime veins mined.
    TotalVeins,
}

/// Milestone settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MilestoneConfig {
    /// Report crossings at all.
    pub enabled: bool,
    /// Counter to measure.
    pub basis: MilestoneBasis,
    /// Ascending thresholds.
    pub thresholds: Vec<u64>,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self { enabled: true, basis: MilestoneBasis::TotalBlocks, thresholds: DEFAULT_MILESTONES.to_vec() }
    }
}

/// Statistics settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsConfig {
    /// Track statistics at all.
    pub enabled: bool,
    /// Milestones.
    pub milestones: MilestoneConfig,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { enabled: true, milestones: MilestoneConfig::default() }
    }
}

/// Lifetime counters for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    /// Veins mined.
    pub total_veins: u64,
    /// Blocks mined through veins.
    pub total_blocks: u64,
    /// Largest single vein.
    pub largest_vein: u64,
    /// Time of the last vein, 0 if never.
    pub last_mined_at: Millis,
    /// Thresholds already reported.
    #[serde(rename = "milestones")]
    pub achieved_milestones: BTreeSet<u64>,
}

impl PlayerStats {
    /// Average vein size, 0 if no veins.
    #[must_use]
    pub fn average_vein(&self) -> f64 {
        if self.total_veins == 0 {
            0.0
        } else {
            self.total_blocks as f64 / self.total_veins as f64
        }
    }

    fn counter(&self, basis: MilestoneBasis) -> u64 {
        match basis {
            MilestoneBasis::TotalBlocks => self.total_blocks,
            MilestoneBasis::TotalVeins => self.total_veins,
        }
    }
}

/// Result of one `record` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsUpdate {
    /// Stats after the update.
    pub stats: PlayerStats,
    /// Thresholds crossed by this update, ascending.
    pub newly_crossed: Vec<u64>,
}

/// Per-player lifetime statistics.
pub struct StatsAggregator {
    config: StatsConfig,
    players: KeyedStore<PlayerId, PlayerStats>,
    dirty: Mutex<HashSet<PlayerId>>,
}

impl std::fmt::Debug for StatsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsAggregator")
            .field("players", &self.players.len())
            .field("dirty", &self.dirty.lock().len())
            .finish()
    }
}

impl StatsAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new(config: StatsConfig) -> Self {
        Self { config, players: KeyedStore::new(), dirty: Mutex::new(HashSet::new()) }
    }

    /// Creates an aggregator seeded with loaded records.
    pub fn with_records(config: StatsConfig, records: impl IntoIterator<Item = (PlayerId, PlayerStats)>) -> Self {
        Self { config, players: KeyedStore::from_entries(records), dirty: Mutex::new(HashSet::new()) }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Records one completed vein.
    ///
    /// Not idempotent: calling twice counts two veins.
    pub fn record(&self, player: &PlayerId, vein_size: usize, now: Millis) -> StatsUpdate {
        if !self.config.enabled {
            return StatsUpdate { stats: PlayerStats::default(), newly_crossed: Vec::new() };
        }

        let size = vein_size as u64;
        let milestones = &self.config.milestones;
        let update = self.players.with(player, PlayerStats::default, |s| {
            s.total_veins += 1;
            s.total_blocks += size;
            s.largest_vein = s.largest_vein.max(size);
            s.last_mined_at = now;

            let mut newly_crossed = Vec::new();
            if milestones.enabled {
                let counter = s.counter(milestones.basis);
                for &t in &milestones.thresholds {
                    if counter >= t && s.achieved_milestones.insert(t) {
                        newly_crossed.push(t);
                    }
                }
                newly_crossed.sort_unstable();
            }
            StatsUpdate { stats: s.clone(), newly_crossed }
        });

        self.dirty.lock().insert(player.clone());
        update
    }

    /// Stats of one player, if any were recorded or loaded.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> Option<PlayerStats> {
        self.players.with_existing(player, |s| s.clone())
    }

    /// Clears one player's stats.
    pub fn reset(&self, player: &PlayerId) -> bool {
        let removed = self.players.remove(player);
        if removed {
            self.dirty.lock().insert(player.clone());
        }
        removed
    }

    /// Top players by lifetime blocks, descending.
    #[must_use]
    pub fn top_by_blocks(&self, n: usize) -> Vec<(PlayerId, PlayerStats)> {
        let mut all = self.players.snapshot();
        all.sort_by(|a, b| b.1.total_blocks.cmp(&a.1.total_blocks).then_with(|| a.0.cmp(&b.0)));
        all.truncate(n);
        all
    }

    /// Every player's stats.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(PlayerId, PlayerStats)> {
        self.players.snapshot()
    }

    /// Drains the players changed since the last call, with current stats.
    ///
    /// A reset player comes back with default stats.
    pub fn take_dirty(&self) -> Vec<(PlayerId, PlayerStats)> {
        let ids: Vec<PlayerId> = self.dirty.lock().drain().collect();
        ids.into_iter()
            .map(|id| {
                let stats = self.get(&id).unwrap_or_default();
                (id, stats)
            })
            .collect()
    }

    /// Puts players back into the pending set after a failed save.
    pub fn mark_dirty(&self, players: impl IntoIterator<Item = PlayerId>) {
        self.dirty.lock().extend(players);
    }

    /// Number of players with pending changes.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.lock().len()
    }
}
