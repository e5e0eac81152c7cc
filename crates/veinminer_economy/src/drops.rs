//! # Drop Tables
//!
//! What a single block yields when broken without enchantments: item, count
//! range, whether Fortune applies, the smelted form and XP values.
//!
//! Tables are keyed by short block id (no namespace). The vanilla table
//! ships built in. Custom tables load from TOML:
//!
//! ```toml
//! [blocks.iron_ore]
//! base-item = "minecraft:raw_iron"
//! count = [1, 1]
//! fortune-sensitive = true
//! smelted-form = "minecraft:iron_ingot"
//! smelt-xp = 0.7
//! xp-weight = 1
//! ```

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use veinminer_core::short_id;

/// Basis points: 10,000 = 100%.
pub const BASIS_POINTS: u32 = 10_000;

/// A bonus item that drops with some probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChanceDrop {
    /// Item id.
    pub item: String,
    /// Drop probability in basis points.
    pub chance_bp: u32,
    /// Inclusive count range when it drops.
    #[serde(default = "one_one")]
    pub count: (u32, u32),
}

/// What one block yields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DropEntry {
    /// Normal drop item id.
    pub base_item: String,
    /// Inclusive base count range. `(0, 0)` means no base drop.
    #[serde(default = "one_one")]
    pub count: (u32, u32),
    /// Fortune multiplies the count.
    #[serde(default)]
    pub fortune_sensitive: bool,
    /// Item produced by auto-smelt.
    #[serde(default)]
    pub smelted_form: Option<String>,
    /// Furnace XP per smelted item.
    #[serde(default)]
    pub smelt_xp: f64,
    /// Multiplier on the configured break XP of the block's category.
    /// `None` counts as 1; vanilla weights follow ore rarity.
    #[serde(default)]
    pub xp_weight: Option<u32>,
    /// Item kept by Silk Touch when it is not the block itself.
    #[serde(default)]
    pub silk_form: Option<String>,
    /// Shears keep the block itself.
    #[serde(default)]
    pub shears_keep: bool,
    /// Bonus drops rolled independently after the base drop.
    #[serde(default)]
    pub chance_drops: Vec<ChanceDrop>,
}

const fn one_one() -> (u32, u32) {
    (1, 1)
}

impl DropEntry {
    /// An entry dropping one `item`.
    #[must_use]
    pub fn simple(item: impl Into<String>) -> Self {
        Self {
            base_item: item.into(),
            count: (1, 1),
            fortune_sensitive: false,
            smelted_form: None,
            smelt_xp: 0.0,
            xp_weight: None,
            silk_form: None,
            shears_keep: false,
            chance_drops: Vec::new(),
        }
    }

    /// Builder: count range.
    #[must_use]
    pub fn count(mut self, min: u32, max: u32) -> Self {
        self.count = (min, max.max(min));
        self
    }

    /// Builder: Fortune applies.
    #[must_use]
    pub fn fortune(mut self) -> Self {
        self.fortune_sensitive = true;
        self
    }

    /// Builder: auto-smelt output and furnace XP.
    #[must_use]
    pub fn smelts_to(mut self, item: impl Into<String>, xp: f64) -> Self {
        self.smelted_form = Some(item.into());
        self.smelt_xp = xp;
        self
    }

    /// Builder: XP weight.
    #[must_use]
    pub fn xp(mut self, weight: u32) -> Self {
        self.xp_weight = Some(weight);
        self
    }

    /// Builder: Silk Touch form.
    #[must_use]
    pub fn silk(mut self, item: impl Into<String>) -> Self {
        self.silk_form = Some(item.into());
        self
    }

    /// Builder: shears keep the block.
    #[must_use]
    pub fn keep_with_shears(mut self) -> Self {
        self.shears_keep = true;
        self
    }

    /// Builder: adds a chance drop.
    #[must_use]
    pub fn with_chance(mut self, item: impl Into<String>, chance_bp: u32, min: u32, max: u32) -> Self {
        self.chance_drops.push(ChanceDrop { item: item.into(), chance_bp, count: (min, max.max(min)) });
        self
    }
}

/// Lookup from block id to its drop entry.
pub trait DropTable: Send + Sync {
    /// Entry for a block id, with or without namespace. `None` = no drop.
    fn entry(&self, block_id: &str) -> Option<&DropEntry>;
}

/// Hash-map backed drop table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DropTableMap {
    /// Entries keyed by short block id.
    pub blocks: HashMap<String, DropEntry>,
}

impl DropTable for DropTableMap {
    fn entry(&self, block_id: &str) -> Option<&DropEntry> {
        self.blocks.get(short_id(block_id))
    }
}

impl DropTableMap {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entry under a short block id.
    pub fn insert(&mut self, block_id: &str, entry: DropEntry) {
        self.blocks.insert(short_id(block_id).to_owned(), entry);
    }

    /// Parses a table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the document is malformed.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|source| StoreError::Decode { what: "drop table".to_owned(), source })
    }

    /// Loads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an IO or decode error.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Overlays another table: its entries replace ours.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.blocks.extend(other.blocks);
        self
    }

    /// The built-in vanilla table for ores, logs and leaves.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn vanilla() -> Self {
        let mut t = Self::new();

        for prefix in ["", "deepslate_"] {
            t.insert(&format!("{prefix}coal_ore"), DropEntry::simple("minecraft:coal").fortune().xp(1));
            t.insert(
                &format!("{prefix}iron_ore"),
                DropEntry::simple("minecraft:raw_iron")
                    .fortune()
                    .smelts_to("minecraft:iron_ingot", 0.7)
                    .xp(1),
            );
            t.insert(
                &format!("{prefix}copper_ore"),
                DropEntry::simple("minecraft:raw_copper")
                    .fortune()
                    .smelts_to("minecraft:copper_ingot", 0.7)
                    .xp(1),
            );
            t.insert(
                &format!("{prefix}gold_ore"),
                DropEntry::simple("minecraft:raw_gold")
                    .fortune()
                    .smelts_to("minecraft:gold_ingot", 1.0)
                    .xp(1),
            );
            t.insert(
                &format!("{prefix}redstone_ore"),
                DropEntry::simple("minecraft:redstone").count(4, 5).fortune().xp(2),
            );
            t.insert(
                &format!("lit_{prefix}redstone_ore"),
                DropEntry::simple("minecraft:redstone")
                    .count(4, 5)
                    .fortune()
                    .xp(2)
                    .silk(format!("minecraft:{prefix}redstone_ore")),
            );
            t.insert(
                &format!("{prefix}lapis_ore"),
                DropEntry::simple("minecraft:lapis_lazuli").count(4, 9).fortune().xp(3),
            );
            t.insert(&format!("{prefix}diamond_ore"), DropEntry::simple("minecraft:diamond").fortune().xp(4));
            t.insert(&format!("{prefix}emerald_ore"), DropEntry::simple("minecraft:emerald").fortune().xp(5));
        }

        t.insert("quartz_ore", DropEntry::simple("minecraft:quartz").fortune().xp(2));
        t.insert("nether_quartz_ore", DropEntry::simple("minecraft:quartz").fortune().xp(2));
        t.insert(
            "nether_gold_ore",
            DropEntry::simple("minecraft:gold_nugget")
                .count(2, 6)
                .fortune()
                .smelts_to("minecraft:gold_ingot", 1.0)
                .xp(1),
        );
        t.insert(
            "ancient_debris",
            DropEntry::simple("minecraft:ancient_debris")
                .smelts_to("minecraft:netherite_scrap", 2.0)
                .xp(2),
        );
        for bud in ["amethyst_cluster", "large_amethyst_bud", "medium_amethyst_bud", "small_amethyst_bud"] {
            t.insert(bud, DropEntry::simple(format!("minecraft:{bud}")).xp(0));
        }

        for log in [
            "oak_log", "spruce_log", "birch_log", "jungle_log", "acacia_log",
            "dark_oak_log", "mangrove_log", "cherry_log", "crimson_stem", "warped_stem",
        ] {
            t.insert(log, DropEntry::simple(format!("minecraft:{log}")));
        }

        for (leaves, sapling, chance_bp) in [
            ("oak_leaves", "oak_sapling", 500),
            ("spruce_leaves", "spruce_sapling", 500),
            ("birch_leaves", "birch_sapling", 500),
            ("jungle_leaves", "jungle_sapling", 250),
            ("acacia_leaves", "acacia_sapling", 500),
            ("dark_oak_leaves", "dark_oak_sapling", 250),
            ("mangrove_leaves", "mangrove_propagule", 500),
            ("cherry_leaves", "cherry_sapling", 500),
        ] {
            t.insert(
                leaves,
                DropEntry::simple(format!("minecraft:{leaves}"))
                    .count(0, 0)
                    .keep_with_shears()
                    .with_chance(format!("minecraft:{sapling}"), chance_bp, 1, 1)
                    .with_chance("minecraft:stick", 200, 1, 2),
            );
        }

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanilla_lookup_ignores_namespace() {
        let t = DropTableMap::vanilla();
        let iron = t.entry("minecraft:iron_ore").unwrap();
        assert_eq!(iron.base_item, "minecraft:raw_iron");
        assert_eq!(iron.smelted_form.as_deref(), Some("minecraft:iron_ingot"));
        assert!(iron.fortune_sensitive);
        assert_eq!(t.entry("deepslate_iron_ore"), Some(iron));
        assert!(t.entry("minecraft:stone").is_none());
    }

    #[test]
    fn test_vanilla_special_cases() {
        let t = DropTableMap::vanilla();
        assert_eq!(
            t.entry("lit_deepslate_redstone_ore").unwrap().silk_form.as_deref(),
            Some("minecraft:deepslate_redstone_ore")
        );
        assert_eq!(t.entry("lapis_ore").unwrap().count, (4, 9));
        assert_eq!(t.entry("emerald_ore").unwrap().xp_weight, Some(5));
        assert!(!t.entry("ancient_debris").unwrap().fortune_sensitive);

        let leaves = t.entry("jungle_leaves").unwrap();
        assert_eq!(leaves.count, (0, 0));
        assert!(leaves.shears_keep);
        assert_eq!(leaves.chance_drops[0].chance_bp, 250);
        assert_eq!(t.entry("mangrove_leaves").unwrap().chance_drops[0].item, "minecraft:mangrove_propagule");
    }

    #[test]
    fn test_toml_table() {
        let text = r#"
            [blocks.ruby_ore]
            base-item = "gems:ruby"
            count = [1, 2]
            fortune-sensitive = true
            xp-weight = 7

            [blocks.oak_log]
            base-item = "minecraft:oak_planks"
            count = [4, 4]
        "#;
        let custom = DropTableMap::from_toml_str(text).unwrap();
        let ruby = custom.entry("gems:ruby_ore").unwrap();
        assert_eq!(ruby.count, (1, 2));
        assert_eq!(ruby.xp_weight, Some(7));
        assert!(ruby.smelted_form.is_none());

        let merged = DropTableMap::vanilla().merged(custom);
        assert_eq!(merged.entry("oak_log").unwrap().base_item, "minecraft:oak_planks");
        assert!(merged.entry("iron_ore").is_some());
    }

    #[test]
    fn test_bad_toml_is_decode_error() {
        let err = DropTableMap::from_toml_str("[blocks.x]\ncount = 3").unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }
}
