//! # Vein Search
//!
//! Bounded breadth-first search from an origin block over a read-only
//! block oracle.
//!
//! ## Guarantees
//!
//! - Every member shares the origin's [`BlockCategory`]
//! - `vein.len() <= limits.effective_max()`
//! - Each position is queried at most once
//! - Identical inputs produce identical discovery order
//!
//! Hitting the budget truncates silently. The only "failure" is an empty vein.

use crate::block::{classify, BlockCategory, BlockKey, ToolCategory};
use crate::pattern::MiningPattern;
use crate::tool::ToolTraits;
use std::collections::{HashMap, HashSet, VecDeque};

/// Internal safety cap used when `max_blocks <= 0` ("unlimited").
pub const SAFETY_CAP: usize = 4096;

/// Default vein budget.
pub const DEFAULT_MAX_BLOCKS: i64 = 64;

/// Default world height bounds (inclusive).
pub const DEFAULT_HEIGHT_BOUNDS: (i32, i32) = (-64, 320);

/// Read-only view of the world used during a search.
///
/// `None` means air or an unloaded position, which classifies as `Other`.
pub trait BlockOracle {
    /// Block id at a position.
    fn block_at(&self, key: BlockKey) -> Option<&str>;
}

impl BlockOracle for HashMap<BlockKey, String> {
    fn block_at(&self, key: BlockKey) -> Option<&str> {
        self.get(&key).map(String::as_str)
    }
}

impl<T: BlockOracle + ?Sized> BlockOracle for &T {
    fn block_at(&self, key: BlockKey) -> Option<&str> {
        (**self).block_at(key)
    }
}

/// Budget and bounds for one search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchLimits {
    /// Block budget. `<= 0` means the internal safety cap.
    pub max_blocks: i64,
    /// Smallest vein worth vein-mining. Caller-side policy.
    pub min_vein_size: usize,
    /// Blocks handed to the world sink per batch.
    pub batch_size: usize,
    /// Inclusive `(min_y, max_y)`. Positions outside are never admitted.
    pub height_bounds: Option<(i32, i32)>,
    /// Maximum Euclidean distance of any member from the origin.
    pub reach_distance: Option<f64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_blocks: DEFAULT_MAX_BLOCKS,
            min_vein_size: 2,
            batch_size: 10,
            height_bounds: Some(DEFAULT_HEIGHT_BOUNDS),
            reach_distance: None,
        }
    }
}

impl SearchLimits {
    /// Limits with the given budget and defaults elsewhere.
    #[must_use]
    pub fn with_max_blocks(max_blocks: i64) -> Self {
        Self { max_blocks, ..Self::default() }
    }

    /// The budget actually enforced.
    #[must_use]
    pub fn effective_max(&self) -> usize {
        if self.max_blocks <= 0 {
            SAFETY_CAP
        } else {
            usize::try_from(self.max_blocks).map_or(SAFETY_CAP, |n| n.min(SAFETY_CAP))
        }
    }

    /// True if the vein meets the size floor.
    #[must_use]
    pub fn accepts(&self, vein: &Vein) -> bool {
        vein.len() >= self.min_vein_size.max(1)
    }

    fn in_bounds(&self, origin: BlockKey, key: BlockKey) -> bool {
        if let Some((lo, hi)) = self.height_bounds {
            if key.y < lo || key.y > hi {
                return false;
            }
        }
        if let Some(reach) = self.reach_distance {
            if key.distance_squared(origin) as f64 > reach * reach {
                return false;
            }
        }
        true
    }
}

/// A discovered vein, in BFS admission order. The origin is first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vein {
    blocks: Vec<BlockKey>,
    category: Option<BlockCategory>,
}

impl Vein {
    /// The empty vein.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a vein from an explicit block list.
    #[must_use]
    pub fn from_blocks(category: BlockCategory, blocks: Vec<BlockKey>) -> Self {
        Self { blocks, category: Some(category) }
    }

    /// Number of blocks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if no block was admitted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in discovery order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[BlockKey] {
        &self.blocks
    }

    /// The origin block, if any.
    #[must_use]
    pub fn origin(&self) -> Option<BlockKey> {
        self.blocks.first().copied()
    }

    /// Shared category of every member.
    #[must_use]
    pub fn category(&self) -> Option<BlockCategory> {
        self.category
    }

    /// Keeps only the first `n` discovered blocks.
    pub fn truncate_to(&mut self, n: usize) {
        self.blocks.truncate(n);
    }

    /// Discovery-order chunks of at most `batch_size` blocks.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = &[BlockKey]> {
        self.blocks.chunks(batch_size.max(1))
    }
}

/// Vein search driven by a mining pattern.
///
/// Holds the precomputed offset list so repeated searches with the same
/// pattern do not rebuild it.
#[derive(Clone, Debug)]
pub struct VeinSearch {
    pattern: MiningPattern,
    offsets: Vec<(i32, i32, i32)>,
}

impl VeinSearch {
    /// Creates a search for a pattern.
    #[must_use]
    pub fn new(pattern: MiningPattern) -> Self {
        Self { offsets: pattern.offsets(), pattern }
    }

    /// The pattern this search expands by.
    #[must_use]
    pub fn pattern(&self) -> MiningPattern {
        self.pattern
    }

    /// Runs the search.
    ///
    /// # Arguments
    ///
    /// * `origin` - The block the player broke
    /// * `oracle` - Read-only world snapshot
    /// * `limits` - Budget and bounds
    /// * `require_tool` - Enforce the origin's tool category
    /// * `tool` - Traits of the held tool
    ///
    /// # Returns
    ///
    /// The vein, or an empty vein if the origin is not a vein block or the
    /// tool check fails.
    pub fn run<O: BlockOracle + ?Sized>(
        &self,
        origin: BlockKey,
        oracle: &O,
        limits: &SearchLimits,
        require_tool: bool,
        tool: ToolTraits,
    ) -> Vein {
        let (category, required) = oracle.block_at(origin).map_or((BlockCategory::Other, ToolCategory::None), classify);

        if !category.is_vein() {
            return Vein::empty();
        }
        if require_tool && !required.is_satisfied_by(tool) {
            return Vein::empty();
        }

        let budget = limits.effective_max();
        let mut blocks = Vec::with_capacity(budget.min(256));
        let mut visited: HashSet<BlockKey> = HashSet::with_capacity(budget.min(256) * 4);
        let mut queue = VecDeque::new();

        visited.insert(origin);
        blocks.push(origin);
        queue.push_back(origin);

        'bfs: while let Some(current) = queue.pop_front() {
            for &offset in &self.offsets {
                if blocks.len() >= budget {
                    break 'bfs;
                }
                let Some(next) = current.offset(offset) else {
                    continue;
                };
                if !visited.insert(next) {
                    continue;
                }
                if !limits.in_bounds(origin, next) {
                    continue;
                }
                let same = oracle
                    .block_at(next)
                    .is_some_and(|id| classify(id).0 == category);
                if same {
                    blocks.push(next);
                    queue.push_back(next);
                }
            }
        }

        Vein::from_blocks(category, blocks)
    }
}

/// One-shot search without caching the offset list.
pub fn search<O: BlockOracle + ?Sized>(
    origin: BlockKey,
    oracle: &O,
    pattern: MiningPattern,
    limits: &SearchLimits,
    require_tool: bool,
    tool: ToolTraits,
) -> Vein {
    VeinSearch::new(pattern).run(origin, oracle, limits, require_tool, tool)
}
