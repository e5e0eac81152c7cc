//! # Fortune Curves
//!
//! A fortune curve turns a base drop count and a Fortune level into the
//! final count. The curve is pluggable so servers can swap the vanilla
//! approximation for a fixed table.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Maps `(base count, fortune level)` to a final count.
pub trait FortuneCurve: Send + Sync {
    /// Applies the curve. `level` is at least 1.
    fn apply(&self, base: u32, level: u8, rng: &mut ChaCha8Rng) -> u32;
}

/// Vanilla-style ore fortune.
///
/// Rolls a bonus in `-1..=level`, clamps it at 0 and multiplies the base
/// count by `bonus + 1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VanillaFortune;

impl FortuneCurve for VanillaFortune {
    fn apply(&self, base: u32, level: u8, rng: &mut ChaCha8Rng) -> u32 {
        let bonus = rng.gen_range(-1..=i32::from(level)).max(0);
        base.saturating_mul(bonus.unsigned_abs() + 1)
    }
}

/// Deterministic multiplier per level. Missing levels multiply by 1.
#[derive(Clone, Debug, Default)]
pub struct TableFortune {
    multipliers: BTreeMap<u8, u32>,
}

impl TableFortune {
    /// Creates a curve from `(level, multiplier)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (u8, u32)>) -> Self {
        Self { multipliers: entries.into_iter().collect() }
    }

    /// Multiplier for a level.
    #[must_use]
    pub fn multiplier(&self, level: u8) -> u32 {
        self.multipliers.get(&level).copied().unwrap_or(1)
    }
}

impl FortuneCurve for TableFortune {
    fn apply(&self, base: u32, level: u8, _rng: &mut ChaCha8Rng) -> u32 {
        base.saturating_mul(self.multiplier(level))
    }
}
