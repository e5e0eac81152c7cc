//! # Reward Engine
//!
//! Turns a discovered vein plus the player's tool into one [`RewardBundle`]:
//! drops, XP and durability cost. Nothing is applied to the world here; the
//! bundle is handed to the caller as a single value.
//!
//! ## Per-Block Rules
//!
//! ```text
//! base drop ──► silk touch? ──yes──► block itself (no smelt, no break XP)
//!                   │no
//!                   ▼
//!              fortune curve ──► auto-smelt? ──► break XP
//! ```
//!
//! After the loop: vein-size XP bonus, durability cost, one rounding of XP.
//!
//! ## Determinism
//!
//! Every random draw comes from a `ChaCha8Rng` seeded by the caller, in
//! discovery order. Same vein, context, config and seed give the same bundle.

use crate::drops::{DropEntry, DropTable, BASIS_POINTS};
use crate::fortune::{FortuneCurve, VanillaFortune};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use veinminer_core::{
    classify, short_id, BlockCategory, BlockOracle, Enchantment, PlayerMiningContext, ToolState, Vein,
};

/// Largest stack handed out in one piece.
pub const MAX_STACK: u32 = 64;

/// Which enchantments the engine honors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnchantConfig {
    /// Silk Touch keeps blocks.
    pub silk_touch: bool,
    /// Fortune multiplies eligible drops.
    pub fortune: bool,
}

impl Default for EnchantConfig {
    fn default() -> Self {
        Self { silk_touch: true, fortune: true }
    }
}

/// Auto-smelt settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoSmeltConfig {
    /// Master switch.
    pub enabled: bool,
    /// Only smelt when the tool has Fortune.
    pub require_fortune: bool,
    /// Award furnace XP for smelted items.
    pub give_xp: bool,
    /// Scale applied to furnace XP.
    pub xp_multiplier: f64,
    /// Short block ids allowed to smelt. Empty allows all.
    pub whitelist: Vec<String>,
}

impl Default for AutoSmeltConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            require_fortune: false,
            give_xp: true,
            xp_multiplier: 0.5,
            whitelist: Vec::new(),
        }
    }
}

/// Tool wear settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurabilityConfig {
    /// Units of wear per block. Fractions round probabilistically.
    pub multiplier: f64,
    /// Unbreaking skips each unit with chance `level / (level + 1)`.
    pub respect_unbreaking: bool,
    /// Let the tool break instead of stopping one use short.
    pub break_on_exceed: bool,
}

impl Default for DurabilityConfig {
    fn default() -> Self {
        Self { multiplier: 1.0, respect_unbreaking: true, break_on_exceed: true }
    }
}

/// Experience settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XpConfig {
    /// Master switch.
    pub enabled: bool,
    /// Break XP per ore, scaled by the entry's XP weight.
    pub base_ore_xp: u32,
    /// Break XP per log.
    pub log_xp: u32,
    /// Break XP per leaf block.
    pub leaf_xp: u32,
    /// Award the vein-size bonus.
    pub bonus_enabled: bool,
    /// Bonus granularity in blocks.
    pub bonus_per_blocks: u32,
    /// XP per full granule.
    pub bonus_amount: u32,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_ore_xp: 1,
            log_xp: 0,
            leaf_xp: 0,
            bonus_enabled: true,
            bonus_per_blocks: 10,
            bonus_amount: 1,
        }
    }
}

/// Bundle of the reward sections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardConfig {
    /// Enchantment toggles.
    pub enchant: EnchantConfig,
    /// Auto-smelt.
    pub auto_smelt: AutoSmeltConfig,
    /// Tool wear.
    pub durability: DurabilityConfig,
    /// Experience.
    pub xp: XpConfig,
}

/// One item line in a bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDrop {
    /// Item id.
    pub item: String,
    /// Count. Always at least 1.
    pub count: u32,
}

/// Everything one vein action yields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardBundle {
    /// Drops in per-block discovery order.
    pub drops: Vec<ItemDrop>,
    /// XP to award.
    pub xp_awarded: u32,
    /// Durability the tool loses.
    pub durability_cost: u32,
    /// At least one item was auto-smelted.
    pub smelted: bool,
    /// The cost uses up the tool.
    pub tool_broken: bool,
}

impl RewardBundle {
    /// Total item count across drops.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.drops.iter().map(|d| u64::from(d.count)).sum()
    }

    /// Count of one item across drops.
    #[must_use]
    pub fn count_of(&self, item: &str) -> u64 {
        self.drops.iter().filter(|d| d.item == item).map(|d| u64::from(d.count)).sum()
    }

    /// Drops merged by item id, in first-seen order.
    #[must_use]
    pub fn coalesced(&self) -> Vec<ItemDrop> {
        let mut out: Vec<ItemDrop> = Vec::new();
        for d in &self.drops {
            match out.iter_mut().find(|o| o.item == d.item) {
                Some(o) => o.count = o.count.saturating_add(d.count),
                None => out.push(d.clone()),
            }
        }
        out
    }

    /// Coalesced drops split into stacks of at most `max_stack`.
    #[must_use]
    pub fn stacks(&self, max_stack: u32) -> Vec<ItemDrop> {
        let max_stack = max_stack.max(1);
        let mut out = Vec::new();
        for d in self.coalesced() {
            let mut left = d.count;
            while left > 0 {
                let n = left.min(max_stack);
                out.push(ItemDrop { item: d.item.clone(), count: n });
                left -= n;
            }
        }
        out
    }
}

/// Reward computation bound to a drop table and fortune curve.
#[derive(Clone)]
pub struct RewardEngine {
    table: Arc<dyn DropTable>,
    curve: Arc<dyn FortuneCurve>,
}

impl std::fmt::Debug for RewardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardEngine").finish_non_exhaustive()
    }
}

impl RewardEngine {
    /// Engine with the vanilla fortune curve.
    #[must_use]
    pub fn new(table: Arc<dyn DropTable>) -> Self {
        Self { table, curve: Arc::new(VanillaFortune) }
    }

    /// Replaces the fortune curve.
    #[must_use]
    pub fn with_curve(mut self, curve: Arc<dyn FortuneCurve>) -> Self {
        self.curve = curve;
        self
    }

    /// Computes the bundle for a vein.
    ///
    /// # Arguments
    ///
    /// * `vein` - Blocks in discovery order
    /// * `oracle` - The same snapshot the vein was found in
    /// * `ctx` - Player, tool and enchantments
    /// * `config` - Reward sections
    /// * `seed` - Seed for every random draw of this action
    pub fn compute<O: BlockOracle + ?Sized>(
        &self,
        vein: &Vein,
        oracle: &O,
        ctx: &PlayerMiningContext,
        config: &RewardConfig,
        seed: u64,
    ) -> RewardBundle {
        compute_rewards(vein, oracle, ctx, self.table.as_ref(), self.curve.as_ref(), config, seed)
    }
}

/// Per-action state threaded through the block loop.
struct Tally {
    drops: Vec<ItemDrop>,
    xp: f64,
    smelted: bool,
}

impl Tally {
    fn push(&mut self, item: &str, count: u32) {
        if count > 0 {
            self.drops.push(ItemDrop { item: item.to_owned(), count });
        }
    }
}

/// Computes the bundle for a vein. See [`RewardEngine::compute`].
pub fn compute_rewards<O: BlockOracle + ?Sized>(
    vein: &Vein,
    oracle: &O,
    ctx: &PlayerMiningContext,
    table: &dyn DropTable,
    curve: &dyn FortuneCurve,
    config: &RewardConfig,
    seed: u64,
) -> RewardBundle {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally = Tally { drops: Vec::with_capacity(vein.len()), xp: 0.0, smelted: false };

    let silk = config.enchant.silk_touch && ctx.enchantments.has(Enchantment::SilkTouch);
    let fortune = if config.enchant.fortune { ctx.enchantments.level(Enchantment::Fortune) } else { 0 };
    let shears = ctx.tool_traits().shears;

    for &key in vein.blocks() {
        let Some(block_id) = oracle.block_at(key) else {
            continue;
        };
        let category = classify(block_id).0;
        let Some(entry) = table.entry(block_id) else {
            continue;
        };

        if silk && matches!(category, BlockCategory::Ore | BlockCategory::Leaf) {
            let kept = entry.silk_form.clone().unwrap_or_else(|| namespaced(block_id));
            tally.push(&kept, 1);
            continue;
        }
        if shears && entry.shears_keep {
            tally.push(&namespaced(block_id), 1);
            continue;
        }

        block_drop(entry, block_id, fortune, curve, config, &mut rng, &mut tally);

        if config.xp.enabled {
            let weight = entry.xp_weight.unwrap_or(1);
            tally.xp += f64::from(match category {
                BlockCategory::Ore => config.xp.base_ore_xp.saturating_mul(weight),
                BlockCategory::Log => config.xp.log_xp.saturating_mul(weight),
                BlockCategory::Leaf => config.xp.leaf_xp.saturating_mul(weight),
                BlockCategory::Other => 0,
            });
        }
    }

    if config.xp.enabled && config.xp.bonus_enabled && config.xp.bonus_per_blocks > 0 {
        let granules = vein.len() as u64 / u64::from(config.xp.bonus_per_blocks);
        tally.xp += (granules * u64::from(config.xp.bonus_amount)) as f64;
    }

    let (durability_cost, tool_broken) = durability_cost(vein.len(), ctx, &config.durability, &mut rng);

    RewardBundle {
        drops: tally.drops,
        xp_awarded: if config.xp.enabled { tally.xp.max(0.0).round() as u32 } else { 0 },
        durability_cost,
        smelted: tally.smelted,
        tool_broken,
    }
}

/// Base drop, fortune, auto-smelt and chance drops for one block.
fn block_drop(
    entry: &DropEntry,
    block_id: &str,
    fortune: u8,
    curve: &dyn FortuneCurve,
    config: &RewardConfig,
    rng: &mut ChaCha8Rng,
    tally: &mut Tally,
) {
    let (lo, hi) = entry.count;
    let mut count = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    if count > 0 && fortune > 0 && entry.fortune_sensitive {
        count = curve.apply(count, fortune, rng);
    }

    let smelt = &config.auto_smelt;
    let smelted_form = entry.smelted_form.as_deref().filter(|_| {
        smelt.enabled
            && (!smelt.require_fortune || fortune > 0)
            && (smelt.whitelist.is_empty() || smelt.whitelist.iter().any(|w| w == short_id(block_id)))
    });

    match smelted_form {
        Some(item) if count > 0 => {
            tally.push(item, count);
            tally.smelted = true;
            if smelt.give_xp && config.xp.enabled {
                tally.xp += entry.smelt_xp * smelt.xp_multiplier * f64::from(count);
            }
        }
        _ => tally.push(&entry.base_item, count),
    }

    for chance in &entry.chance_drops {
        if rng.gen_range(0..BASIS_POINTS) < chance.chance_bp {
            let (lo, hi) = chance.count;
            let n = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
            tally.push(&chance.item, n);
        }
    }
}

/// Durability cost for `blocks` blocks and whether it breaks the tool.
fn durability_cost(
    blocks: usize,
    ctx: &PlayerMiningContext,
    config: &DurabilityConfig,
    rng: &mut ChaCha8Rng,
) -> (u32, bool) {
    let tool: ToolState = ctx.tool;
    if !tool.is_damageable() || blocks == 0 || config.multiplier <= 0.0 {
        return (0, false);
    }

    let raw = blocks as f64 * config.multiplier;
    let whole = raw.floor();
    let mut units = whole as u64;
    if rng.gen_bool((raw - whole).clamp(0.0, 1.0)) {
        units += 1;
    }

    let unbreaking = ctx.enchantments.level(Enchantment::Unbreaking);
    if config.respect_unbreaking && unbreaking > 0 {
        let keep = 1.0 / (f64::from(unbreaking) + 1.0);
        units = (0..units).filter(|_| rng.gen_bool(keep)).count() as u64;
    }

    let remaining = u64::from(tool.remaining());
    if units > 0 && units >= remaining {
        if config.break_on_exceed {
            return (remaining as u32, true);
        }
        return (remaining.saturating_sub(1) as u32, false);
    }
    (units as u32, false)
}

fn namespaced(block_id: &str) -> String {
    if block_id.contains(':') {
        block_id.to_owned()
    } else {
        format!("minecraft:{block_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drops::DropTableMap;
    use crate::fortune::TableFortune;
    use std::collections::HashMap;
    use veinminer_core::{BlockKey, Enchantments, MiningPattern, SearchLimits, VeinSearch};

    fn iron_line(n: i32) -> HashMap<BlockKey, String> {
        (0..n).map(|x| (BlockKey::new(x, 0, 0), "minecraft:iron_ore".to_owned())).collect()
    }

    fn vein_of(world: &HashMap<BlockKey, String>, tool: &str) -> Vein {
        VeinSearch::new(MiningPattern::adjacent(false)).run(
            BlockKey::new(0, 0, 0),
            world,
            &SearchLimits::with_max_blocks(64),
            true,
            veinminer_core::ToolTraits::of(tool),
        )
    }

    fn no_bonus() -> RewardConfig {
        RewardConfig {
            xp: XpConfig { bonus_enabled: false, base_ore_xp: 3, ..XpConfig::default() },
            ..RewardConfig::default()
        }
    }

    /// Iron ore without a declared XP weight, so the configured XP applies as is.
    fn plain_iron_table() -> DropTableMap {
        let mut t = DropTableMap::new();
        t.insert("iron_ore", DropEntry::simple("minecraft:raw_iron").fortune().smelts_to("minecraft:iron_ingot", 0.7));
        t
    }

    fn ctx(tool: &str) -> PlayerMiningContext {
        PlayerMiningContext::new("p1", tool)
    }

    #[test]
    fn test_five_iron_plain() {
        let world = iron_line(5);
        let vein = vein_of(&world, "minecraft:iron_pickaxe");
        let b = compute_rewards(&vein, &world, &ctx("minecraft:iron_pickaxe"), &plain_iron_table(), &VanillaFortune, &no_bonus(), 1);
        assert_eq!(b.count_of("minecraft:raw_iron"), 5);
        assert_eq!(b.drops.len(), 5);
        assert!(!b.smelted);
        assert_eq!(b.xp_awarded, 15);
    }

    #[test]
    fn test_five_iron_auto_smelt() {
        let world = iron_line(5);
        let vein = vein_of(&world, "minecraft:iron_pickaxe");
        let mut cfg = no_bonus();
        cfg.auto_smelt.enabled = true;
        let b = compute_rewards(&vein, &world, &ctx("minecraft:iron_pickaxe"), &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert_eq!(b.count_of("minecraft:iron_ingot"), 5);
        assert_eq!(b.count_of("minecraft:raw_iron"), 0);
        assert!(b.smelted);
        // 15 break XP + 5 * 0.7 * 0.5 smelt XP
        assert_eq!(b.xp_awarded, 17);
    }

    #[test]
    fn test_five_iron_silk_touch() {
        let world = iron_line(5);
        let vein = vein_of(&world, "minecraft:iron_pickaxe");
        let mut cfg = no_bonus();
        cfg.auto_smelt.enabled = true;
        let c = ctx("minecraft:iron_pickaxe").with_enchantments(Enchantments::none().with(Enchantment::SilkTouch, 1));
        let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert_eq!(b.count_of("minecraft:iron_ore"), 5);
        assert!(!b.smelted);
        assert_eq!(b.xp_awarded, 0);
    }

    #[test]
    fn test_silk_form_override() {
        let world: HashMap<_, _> = [(BlockKey::new(0, 0, 0), "minecraft:lit_redstone_ore".to_owned())].into();
        let vein = Vein::from_blocks(BlockCategory::Ore, vec![BlockKey::new(0, 0, 0)]);
        let c = ctx("diamond_pickaxe").with_enchantments(Enchantments::none().with(Enchantment::SilkTouch, 1));
        let b = compute_rewards(&vein, &world, &c, &DropTableMap::vanilla(), &VanillaFortune, &RewardConfig::default(), 3);
        assert_eq!(b.drops, vec![ItemDrop { item: "minecraft:redstone_ore".into(), count: 1 }]);
    }

    #[test]
    fn test_fortune_through_curve() {
        let world = iron_line(4);
        let vein = vein_of(&world, "minecraft:iron_pickaxe");
        let c = ctx("minecraft:iron_pickaxe").with_enchantments(Enchantments::none().with(Enchantment::Fortune, 2));
        let curve = TableFortune::new([(2, 3)]);
        let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &curve, &no_bonus(), 1);
        assert_eq!(b.count_of("minecraft:raw_iron"), 12);

        let missing = TableFortune::new([(3, 9)]);
        let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &missing, &no_bonus(), 1);
        assert_eq!(b.count_of("minecraft:raw_iron"), 4);
    }

    #[test]
    fn test_auto_smelt_require_fortune_and_whitelist() {
        let world = iron_line(2);
        let vein = vein_of(&world, "minecraft:iron_pickaxe");
        let mut cfg = no_bonus();
        cfg.auto_smelt.enabled = true;
        cfg.auto_smelt.require_fortune = true;
        let b = compute_rewards(&vein, &world, &ctx("minecraft:iron_pickaxe"), &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert!(!b.smelted);

        cfg.auto_smelt.require_fortune = false;
        cfg.auto_smelt.whitelist = vec!["gold_ore".into()];
        let b = compute_rewards(&vein, &world, &ctx("minecraft:iron_pickaxe"), &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert!(!b.smelted);

        cfg.auto_smelt.whitelist.push("iron_ore".into());
        let b = compute_rewards(&vein, &world, &ctx("minecraft:iron_pickaxe"), &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert!(b.smelted);
    }

    #[test]
    fn test_unknown_block_is_zero_effect() {
        let world: HashMap<_, _> = [(BlockKey::new(0, 0, 0), "modded:mystery_ore".to_owned())].into();
        let vein = Vein::from_blocks(BlockCategory::Ore, vec![BlockKey::new(0, 0, 0)]);
        let b = compute_rewards(&vein, &world, &ctx("iron_pickaxe"), &DropTableMap::vanilla(), &VanillaFortune, &no_bonus(), 1);
        assert!(b.drops.is_empty());
        assert_eq!(b.xp_awarded, 0);
    }

    #[test]
    fn test_vein_size_bonus() {
        let world = iron_line(25);
        let vein = vein_of(&world, "iron_pickaxe");
        let cfg = RewardConfig {
            xp: XpConfig { base_ore_xp: 0, bonus_per_blocks: 10, bonus_amount: 4, ..XpConfig::default() },
            ..RewardConfig::default()
        };
        let b = compute_rewards(&vein, &world, &ctx("iron_pickaxe"), &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert_eq!(b.xp_awarded, 8);
    }

    #[test]
    fn test_xp_disabled() {
        let world = iron_line(20);
        let vein = vein_of(&world, "iron_pickaxe");
        let mut cfg = RewardConfig::default();
        cfg.xp.enabled = false;
        cfg.auto_smelt.enabled = true;
        let b = compute_rewards(&vein, &world, &ctx("iron_pickaxe"), &DropTableMap::vanilla(), &VanillaFortune, &cfg, 1);
        assert_eq!(b.xp_awarded, 0);
    }

    #[test]
    fn test_durability_basic_and_cap() {
        let world = iron_line(10);
        let vein = vein_of(&world, "iron_pickaxe");
        let c = ctx("iron_pickaxe").with_tool_state(ToolState::new(250, 0));
        let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &VanillaFortune, &no_bonus(), 1);
        assert_eq!(b.durability_cost, 10);
        assert!(!b.tool_broken);

        let worn = ctx("iron_pickaxe").with_tool_state(ToolState::new(250, 245));
        let b = compute_rewards(&vein, &world, &worn, &plain_iron_table(), &VanillaFortune, &no_bonus(), 1);
        assert_eq!(b.durability_cost, 5);
        assert!(b.tool_broken);

        let mut keep = no_bonus();
        keep.durability.break_on_exceed = false;
        let b = compute_rewards(&vein, &world, &worn, &plain_iron_table(), &VanillaFortune, &keep, 1);
        assert_eq!(b.durability_cost, 4);
        assert!(!b.tool_broken);
    }

    #[test]
    fn test_zero_cost_does_not_break_worn_tool() {
        let world = iron_line(1);
        let vein = vein_of(&world, "iron_pickaxe");
        let spent = ctx("iron_pickaxe").with_tool_state(ToolState::new(250, 250));
        let mut cfg = no_bonus();
        cfg.durability.multiplier = 1e-9;
        let b = compute_rewards(&vein, &world, &spent, &plain_iron_table(), &VanillaFortune, &cfg, 1);
        assert_eq!(b.durability_cost, 0);
        assert!(!b.tool_broken);
    }

    #[test]
    fn test_configured_ore_xp_scales_vanilla_weights() {
        let table = DropTableMap::vanilla();
        let cfg = no_bonus(); // base_ore_xp = 3

        let world = iron_line(5);
        let vein = vein_of(&world, "iron_pickaxe");
        let b = compute_rewards(&vein, &world, &ctx("iron_pickaxe"), &table, &VanillaFortune, &cfg, 1);
        assert_eq!(b.xp_awarded, 15);

        let diamonds: HashMap<BlockKey, String> =
            (0..2).map(|x| (BlockKey::new(x, 0, 0), "minecraft:diamond_ore".to_owned())).collect();
        let vein = vein_of(&diamonds, "iron_pickaxe");
        let b = compute_rewards(&vein, &diamonds, &ctx("iron_pickaxe"), &table, &VanillaFortune, &cfg, 1);
        // weight 4 per diamond ore
        assert_eq!(b.xp_awarded, 24);

        let mut off = cfg;
        off.xp.base_ore_xp = 0;
        let b = compute_rewards(&vein, &diamonds, &ctx("iron_pickaxe"), &table, &VanillaFortune, &off, 1);
        assert_eq!(b.xp_awarded, 0);
    }

    #[test]
    fn test_durability_unbreaking_and_unbreakable() {
        let world = iron_line(60);
        let vein = vein_of(&world, "iron_pickaxe");
        let c = ctx("iron_pickaxe")
            .with_tool_state(ToolState::new(1561, 0))
            .with_enchantments(Enchantments::none().with(Enchantment::Unbreaking, 3));
        let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &VanillaFortune, &no_bonus(), 42);
        assert!(b.durability_cost < 60);

        let mut ignore = no_bonus();
        ignore.durability.respect_unbreaking = false;
        let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &VanillaFortune, &ignore, 42);
        assert_eq!(b.durability_cost, 60);

        let mut state = ToolState::new(1561, 0);
        state.unbreakable = true;
        let b = compute_rewards(&vein, &world, &ctx("iron_pickaxe").with_tool_state(state), &plain_iron_table(), &VanillaFortune, &ignore, 42);
        assert_eq!(b.durability_cost, 0);
    }

    #[test]
    fn test_fractional_multiplier() {
        let world = iron_line(3);
        let vein = vein_of(&world, "iron_pickaxe");
        let c = ctx("iron_pickaxe").with_tool_state(ToolState::new(250, 0));
        let mut cfg = no_bonus();
        cfg.durability.multiplier = 0.5;
        for seed in 0..20 {
            let b = compute_rewards(&vein, &world, &c, &plain_iron_table(), &VanillaFortune, &cfg, seed);
            assert!(b.durability_cost == 1 || b.durability_cost == 2);
        }
    }

    #[test]
    fn test_leaves_shears_and_chance() {
        let world: HashMap<_, _> = (0..200).map(|x| (BlockKey::new(x, 0, 0), "minecraft:oak_leaves".to_owned())).collect();
        let vein = Vein::from_blocks(BlockCategory::Leaf, (0..200).map(|x| BlockKey::new(x, 0, 0)).collect());
        let table = DropTableMap::vanilla();

        let b = compute_rewards(&vein, &world, &ctx("minecraft:shears"), &table, &VanillaFortune, &no_bonus(), 5);
        assert_eq!(b.count_of("minecraft:oak_leaves"), 200);

        let b = compute_rewards(&vein, &world, &ctx("minecraft:iron_hoe"), &table, &VanillaFortune, &no_bonus(), 5);
        assert_eq!(b.count_of("minecraft:oak_leaves"), 0);
        assert!(b.count_of("minecraft:oak_sapling") < 200);
        assert!(b.drops.iter().all(|d| d.item == "minecraft:oak_sapling" || d.item == "minecraft:stick"));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let world = iron_line(30);
        let vein = vein_of(&world, "iron_pickaxe");
        let c = ctx("iron_pickaxe")
            .with_enchantments(Enchantments::none().with(Enchantment::Fortune, 3).with(Enchantment::Unbreaking, 2))
            .with_tool_state(ToolState::new(250, 0));
        let table = DropTableMap::vanilla();
        let run = |seed| compute_rewards(&vein, &world, &c, &table, &VanillaFortune, &RewardConfig::default(), seed);
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_coalesce_and_stacks() {
        let b = RewardBundle {
            drops: vec![
                ItemDrop { item: "a".into(), count: 40 },
                ItemDrop { item: "b".into(), count: 1 },
                ItemDrop { item: "a".into(), count: 40 },
            ],
            ..RewardBundle::default()
        };
        assert_eq!(
            b.coalesced(),
            vec![ItemDrop { item: "a".into(), count: 80 }, ItemDrop { item: "b".into(), count: 1 }]
        );
        let stacks: Vec<_> = b.stacks(MAX_STACK).into_iter().map(|d| d.count).collect();
        assert_eq!(stacks, vec![64, 16, 1]);
        assert_eq!(b.total_items(), 81);
    }

    #[test]
    fn test_engine_wrapper() {
        let world = iron_line(3);
        let vein = vein_of(&world, "iron_pickaxe");
        let engine = RewardEngine::new(Arc::new(plain_iron_table())).with_curve(Arc::new(TableFortune::default()));
        let b = engine.compute(&vein, &world, &ctx("iron_pickaxe"), &no_bonus(), 0);
        assert_eq!(b.count_of("minecraft:raw_iron"), 3);
    }
}
