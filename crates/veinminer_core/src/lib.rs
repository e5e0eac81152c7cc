//! # VeinMiner Core
//!
//! Vein discovery for block-breaking games: when a player breaks one block
//! of a connected cluster (ore, log or leaf), find every block of that
//! cluster the player may break along with it.
//!
//! ## Pipeline Position
//!
//! ```text
//! block break ──► VeinSearch ──► RateLimiter ──► RewardEngine ──► Stats
//!                 (this crate)   (security)      (economy)        (economy)
//! ```
//!
//! ## Rules
//!
//! 1. **Pure** - no clock, no IO. Time and world state are passed in
//! 2. **Total** - unknown block ids classify as `Other`, never an error
//! 3. **Bounded** - a search never exceeds [`search::SAFETY_CAP`] blocks
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use veinminer_core::{BlockKey, MiningPattern, SearchLimits, ToolTraits, VeinSearch};
//!
//! let mut world = HashMap::new();
//! for x in 0..3 {
//!     world.insert(BlockKey::new(x, 0, 0), "minecraft:iron_ore".to_owned());
//! }
//! let vein = VeinSearch::new(MiningPattern::adjacent(false)).run(
//!     BlockKey::new(0, 0, 0),
//!     &world,
//!     &SearchLimits::default(),
//!     true,
//!     ToolTraits::of("minecraft:iron_pickaxe"),
//! );
//! assert_eq!(vein.len(), 3);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod context;
pub mod filter;
pub mod pattern;
pub mod search;
pub mod sync;
pub mod tool;

pub use block::{category_of, classify, short_id, BlockCategory, BlockKey, ToolCategory};
pub use context::{Millis, PlayerId, PlayerMiningContext, PERMISSION_BLOCK_PREFIX, PERMISSION_USE};
pub use filter::{BlockFilter, CategoryToggles};
pub use pattern::{MiningPattern, PatternShape};
pub use search::{search, BlockOracle, SearchLimits, Vein, VeinSearch, SAFETY_CAP};
pub use sync::KeyedStore;
pub use tool::{Enchantment, Enchantments, ToolState, ToolTraits};
