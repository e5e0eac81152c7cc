//! # Tools
//!
//! Tool traits derived from item ids, enchantment levels and the
//! durability snapshot of the tool in hand.

use crate::block::{short_id, ToolCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capabilities of a held item, derived from its id suffix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolTraits {
    /// `*_pickaxe`.
    pub pickaxe: bool,
    /// `*_axe` (not pickaxe).
    pub axe: bool,
    /// `*_shovel`.
    pub shovel: bool,
    /// `*_hoe`.
    pub hoe: bool,
    /// `*_sword`.
    pub sword: bool,
    /// `shears`.
    pub shears: bool,
}

impl ToolTraits {
    /// Derives traits from an item id. An empty id or `hand` has no traits.
    #[must_use]
    pub fn of(tool_id: &str) -> Self {
        let id = short_id(tool_id);
        let pickaxe = id.ends_with("_pickaxe");
        Self {
            pickaxe,
            axe: !pickaxe && id.ends_with("_axe"),
            shovel: id.ends_with("_shovel"),
            hoe: id.ends_with("_hoe"),
            sword: id.ends_with("_sword"),
            shears: id == "shears",
        }
    }
}

impl ToolCategory {
    /// Returns true if a tool with the given traits may harvest this category.
    #[inline]
    #[must_use]
    pub const fn is_satisfied_by(self, traits: ToolTraits) -> bool {
        match self {
            Self::Pickaxe => traits.pickaxe,
            Self::Axe => traits.axe,
            Self::ShearsOrHoeOrAxe => traits.shears || traits.hoe || traits.axe,
            Self::None => true,
        }
    }
}

/// Enchantments the reward engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Enchantment {
    /// Drops the block itself.
    SilkTouch,
    /// Multiplies eligible drop counts.
    Fortune,
    /// Reduces durability loss.
    Unbreaking,
}

impl Enchantment {
    /// Parses an enchantment id such as `minecraft:fortune`.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match short_id(id) {
            "silk_touch" => Some(Self::SilkTouch),
            "fortune" => Some(Self::Fortune),
            "unbreaking" => Some(Self::Unbreaking),
            _ => None,
        }
    }
}

/// Enchantment levels on a tool. Absent means level 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enchantments {
    levels: BTreeMap<Enchantment, u8>,
}

impl Enchantments {
    /// No enchantments.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder: sets a level. Level 0 removes the enchantment.
    #[must_use]
    pub fn with(mut self, enchantment: Enchantment, level: u8) -> Self {
        self.set(enchantment, level);
        self
    }

    /// Sets a level. Level 0 removes the enchantment.
    pub fn set(&mut self, enchantment: Enchantment, level: u8) {
        if level == 0 {
            self.levels.remove(&enchantment);
        } else {
            self.levels.insert(enchantment, level);
        }
    }

    /// Level of an enchantment, 0 when absent.
    #[inline]
    #[must_use]
    pub fn level(&self, enchantment: Enchantment) -> u8 {
        self.levels.get(&enchantment).copied().unwrap_or(0)
    }

    /// True if the enchantment is present at level 1 or more.
    #[inline]
    #[must_use]
    pub fn has(&self, enchantment: Enchantment) -> bool {
        self.level(enchantment) > 0
    }

    /// Builds from `(id, level)` pairs, ignoring unknown ids.
    pub fn from_ids<'a>(pairs: impl IntoIterator<Item = (&'a str, u8)>) -> Self {
        let mut out = Self::default();
        for (id, level) in pairs {
            if let Some(e) = Enchantment::from_id(id) {
                out.set(e, level);
            }
        }
        out
    }
}

/// Durability snapshot of the tool in hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolState {
    /// Maximum durability. Zero means the item has no durability.
    pub max_durability: u32,
    /// Damage already taken.
    pub damage: u32,
    /// Unbreakable items never take damage.
    pub unbreakable: bool,
}

impl ToolState {
    /// A damageable tool with the given maximum and current damage.
    #[must_use]
    pub const fn new(max_durability: u32, damage: u32) -> Self {
        Self { max_durability, damage, unbreakable: false }
    }

    /// True if this tool can lose durability at all.
    #[inline]
    #[must_use]
    pub const fn is_damageable(&self) -> bool {
        !self.unbreakable && self.max_durability > 0
    }

    /// Uses left before the tool breaks.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.max_durability.saturating_sub(self.damage)
    }
}
