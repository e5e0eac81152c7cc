//! # Block Filter
//!
//! Decides which block ids may start a vein. Built once from configuration:
//! category toggles plus per-block overrides keyed by upper-case short name
//! (`IRON_ORE = false`).

use crate::block::{classify, short_id, BlockCategory};
use std::collections::{BTreeMap, HashSet};

/// Ore ids and the config names that toggle them.
const ORES: &[(&str, &[&str])] = &[
    ("coal_ore", &["COAL_ORE"]),
    ("iron_ore", &["IRON_ORE"]),
    ("gold_ore", &["GOLD_ORE"]),
    ("diamond_ore", &["DIAMOND_ORE"]),
    ("emerald_ore", &["EMERALD_ORE"]),
    ("lapis_ore", &["LAPIS_ORE"]),
    ("copper_ore", &["COPPER_ORE"]),
    ("redstone_ore", &["REDSTONE_ORE"]),
    ("lit_redstone_ore", &["REDSTONE_ORE"]),
    ("deepslate_coal_ore", &["DEEPSLATE_COAL_ORE"]),
    ("deepslate_iron_ore", &["DEEPSLATE_IRON_ORE"]),
    ("deepslate_gold_ore", &["DEEPSLATE_GOLD_ORE"]),
    ("deepslate_diamond_ore", &["DEEPSLATE_DIAMOND_ORE"]),
    ("deepslate_emerald_ore", &["DEEPSLATE_EMERALD_ORE"]),
    ("deepslate_lapis_ore", &["DEEPSLATE_LAPIS_ORE"]),
    ("deepslate_copper_ore", &["DEEPSLATE_COPPER_ORE"]),
    ("deepslate_redstone_ore", &["DEEPSLATE_REDSTONE_ORE"]),
    ("lit_deepslate_redstone_ore", &["DEEPSLATE_REDSTONE_ORE"]),
    ("quartz_ore", &["QUARTZ_ORE"]),
    ("nether_quartz_ore", &["QUARTZ_ORE"]),
    ("nether_gold_ore", &["NETHER_GOLD_ORE"]),
    ("ancient_debris", &["ANCIENT_DEBRIS"]),
    ("amethyst_cluster", &["AMETHYST_CLUSTER"]),
    ("large_amethyst_bud", &["AMETHYST_CLUSTER"]),
    ("medium_amethyst_bud", &["AMETHYST_CLUSTER"]),
    ("small_amethyst_bud", &["AMETHYST_CLUSTER"]),
];

/// Log ids with their specific and legacy group names.
const LOGS: &[(&str, &[&str])] = &[
    ("oak_log", &["OAK_LOG", "LOG"]),
    ("spruce_log", &["SPRUCE_LOG", "LOG"]),
    ("birch_log", &["BIRCH_LOG", "LOG"]),
    ("jungle_log", &["JUNGLE_LOG", "LOG"]),
    ("acacia_log", &["ACACIA_LOG", "LOG2"]),
    ("dark_oak_log", &["DARK_OAK_LOG", "LOG2"]),
    ("mangrove_log", &["MANGROVE_LOG"]),
    ("cherry_log", &["CHERRY_LOG"]),
    ("crimson_stem", &["CRIMSON_STEM"]),
    ("warped_stem", &["WARPED_STEM"]),
];

/// Leaf ids with their specific and legacy group names.
const LEAVES: &[(&str, &[&str])] = &[
    ("oak_leaves", &["OAK_LEAVES", "LEAVES"]),
    ("spruce_leaves", &["SPRUCE_LEAVES", "LEAVES"]),
    ("birch_leaves", &["BIRCH_LEAVES", "LEAVES"]),
    ("jungle_leaves", &["JUNGLE_LEAVES", "LEAVES"]),
    ("acacia_leaves", &["ACACIA_LEAVES", "LEAVES2"]),
    ("dark_oak_leaves", &["DARK_OAK_LEAVES", "LEAVES2"]),
    ("mangrove_leaves", &["MANGROVE_LEAVES"]),
    ("cherry_leaves", &["CHERRY_LEAVES"]),
];

/// Category toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryToggles {
    /// Ores, ancient debris, amethyst.
    pub ores: bool,
    /// Logs and stems.
    pub logs: bool,
    /// Leaves.
    pub leaves: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self { ores: true, logs: true, leaves: true }
    }
}

/// Set of short block ids that may start a vein.
#[derive(Clone, Debug)]
pub struct BlockFilter {
    enabled: HashSet<&'static str>,
}

impl Default for BlockFilter {
    fn default() -> Self {
        Self::new(CategoryToggles::default(), &BTreeMap::new())
    }
}

impl BlockFilter {
    /// Builds the filter from category toggles and per-block overrides.
    ///
    /// The first override name found for a block wins. Blocks without an
    /// override are enabled when their category is.
    #[must_use]
    pub fn new(toggles: CategoryToggles, overrides: &BTreeMap<String, bool>) -> Self {
        let lookup = |names: &[&str]| {
            names
                .iter()
                .find_map(|n| overrides.get(*n).copied())
                .unwrap_or(true)
        };

        let mut enabled = HashSet::new();
        for (on, table) in [(toggles.ores, ORES), (toggles.logs, LOGS), (toggles.leaves, LEAVES)] {
            if !on {
                continue;
            }
            enabled.extend(table.iter().filter(|(_, names)| lookup(*names)).map(|(id, _)| *id));
        }
        Self { enabled }
    }

    /// True if breaking this block may start a vein.
    #[must_use]
    pub fn allows(&self, block_id: &str) -> bool {
        self.enabled.contains(short_id(block_id))
    }

    /// Number of enabled block ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// True if nothing is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Enabled ids of one category.
    pub fn enabled_in(&self, category: BlockCategory) -> impl Iterator<Item = &'static str> + '_ {
        self.enabled.iter().copied().filter(move |id| classify(id).0 == category)
    }
}
