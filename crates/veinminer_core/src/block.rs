//! # Blocks
//!
//! Block coordinates and the static block classifier.
//!
//! The classifier is a pure, total function over block ids. Unknown or
//! non-vein ids map to `(Other, None)` instead of failing.

use serde::{Deserialize, Serialize};

/// Integer coordinate of a single block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockKey {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (height).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockKey {
    /// Creates a new block key.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this key shifted by an offset, or `None` on coordinate overflow.
    #[inline]
    #[must_use]
    pub fn offset(self, (dx, dy, dz): (i32, i32, i32)) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// Squared Euclidean distance to another key.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }
}

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Vein category of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// Ores, ancient debris, amethyst.
    Ore,
    /// Logs and nether stems.
    Log,
    /// Leaves.
    Leaf,
    /// Anything that never forms a vein.
    Other,
}

impl BlockCategory {
    /// Returns true if blocks of this category can form a vein.
    #[inline]
    #[must_use]
    pub const fn is_vein(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Tool class required to harvest a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    /// Any pickaxe.
    Pickaxe,
    /// Any axe.
    Axe,
    /// Shears, any hoe or any axe.
    ShearsOrHoeOrAxe,
    /// No requirement.
    None,
}

/// Ore-like blocks that do not end in `_ore`.
const EXTRA_ORES: [&str; 5] = [
    "ancient_debris",
    "amethyst_cluster",
    "large_amethyst_bud",
    "medium_amethyst_bud",
    "small_amethyst_bud",
];

/// Strips a leading `namespace:` prefix from a block or item id.
///
/// ```
/// use veinminer_core::block::short_id;
/// assert_eq!(short_id("minecraft:iron_ore"), "iron_ore");
/// assert_eq!(short_id("iron_ore"), "iron_ore");
/// ```
#[inline]
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, rest)| rest)
}

/// Classifies a block id into its vein category and required tool.
///
/// Matching is case-sensitive on the id with any namespace removed.
#[must_use]
pub fn classify(block_id: &str) -> (BlockCategory, ToolCategory) {
    let id = short_id(block_id);

    if id.ends_with("_log") || id.ends_with("_stem") {
        return (BlockCategory::Log, ToolCategory::Axe);
    }
    if id.ends_with("_leaves") {
        return (BlockCategory::Leaf, ToolCategory::ShearsOrHoeOrAxe);
    }
    if id.ends_with("_ore") || EXTRA_ORES.contains(&id) {
        return (BlockCategory::Ore, ToolCategory::Pickaxe);
    }

    (BlockCategory::Other, ToolCategory::None)
}

/// Convenience wrapper returning only the category.
#[inline]
#[must_use]
pub fn category_of(block_id: &str) -> BlockCategory {
    classify(block_id).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ores() {
        for id in [
            "minecraft:iron_ore",
            "deepslate_diamond_ore",
            "minecraft:lit_redstone_ore",
            "nether_quartz_ore",
            "minecraft:ancient_debris",
            "small_amethyst_bud",
        ] {
            assert_eq!(classify(id), (BlockCategory::Ore, ToolCategory::Pickaxe), "{id}");
        }
    }

    #[test]
    fn test_classify_logs_and_leaves() {
        assert_eq!(classify("minecraft:oak_log"), (BlockCategory::Log, ToolCategory::Axe));
        assert_eq!(classify("crimson_stem"), (BlockCategory::Log, ToolCategory::Axe));
        assert_eq!(
            classify("minecraft:cherry_leaves"),
            (BlockCategory::Leaf, ToolCategory::ShearsOrHoeOrAxe)
        );
    }

    #[test]
    fn test_classify_is_total() {
        for id in ["", "minecraft:stone", "dirt", "IRON_ORE", "a:b:c", "ore"] {
            assert_eq!(classify(id), (BlockCategory::Other, ToolCategory::None), "{id}");
        }
    }

    #[test]
    fn test_namespace_is_optional() {
        assert_eq!(classify("iron_ore"), classify("minecraft:iron_ore"));
        assert_eq!(classify("custom:copper_ore").0, BlockCategory::Ore);
    }

    #[test]
    fn test_offset_and_distance() {
        let a = BlockKey::new(1, 2, 3);
        assert_eq!(a.offset((1, -1, 0)), Some(BlockKey::new(2, 1, 3)));
        assert_eq!(BlockKey::new(i32::MAX, 0, 0).offset((1, 0, 0)), None);
        assert_eq!(a.distance_squared(BlockKey::new(4, 6, 3)), 25);
    }
}
