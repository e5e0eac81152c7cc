//! # VeinMiner Economy
//!
//! What a vein pays out, and what it leaves behind in the player's record.
//!
//! ## Design Principles
//!
//! 1. **Seeded rewards** - One `ChaCha8Rng` per action; the same seed gives the same bundle
//! 2. **Data-driven drops** - Drop tables load from TOML and override the vanilla set
//! 3. **Persistence off the hot path** - Stats are saved by a background writer
//!
//! ## Example
//!
//! ```rust,ignore
//! use veinminer_economy::{DropTableMap, RewardConfig, RewardEngine};
//!
//! let engine = RewardEngine::new(Arc::new(DropTableMap::vanilla()));
//! let bundle = engine.compute(&vein, &world, &ctx, &RewardConfig::default(), seed);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod drops;
pub mod error;
pub mod fortune;
pub mod rewards;
pub mod stats;
pub mod store;

pub use drops::{ChanceDrop, DropEntry, DropTable, DropTableMap, BASIS_POINTS};
pub use error::{StoreError, StoreResult};
pub use fortune::{FortuneCurve, TableFortune, VanillaFortune};
pub use rewards::{
    compute_rewards, AutoSmeltConfig, DurabilityConfig, EnchantConfig, ItemDrop, RewardBundle,
    RewardConfig, RewardEngine, XpConfig, MAX_STACK,
};
pub use stats::{
    MilestoneBasis, MilestoneConfig, PlayerStats, StatsAggregator, StatsConfig, StatsUpdate,
    DEFAULT_MILESTONES,
};
pub use store::{
    open_store, AutoSaver, FileStatsStore, NullStatsStore, SqliteStatsStore, StatsRecord,
    StatsStore, StorageKind, StoreConfig,
};
