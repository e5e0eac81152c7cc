//! # Pipeline Integration Tests
//!
//! Break events through the public `VeinMiner` API: rewards, limits,
//! permissions and persisted statistics.

use std::collections::HashMap;
use std::sync::Arc;

use veinminer::core::{
    BlockKey, Enchantment, Enchantments, PlayerId, PlayerMiningContext, PERMISSION_BLOCK_PREFIX,
    PERMISSION_USE,
};
use veinminer::economy::{DropTableMap, NullStatsStore, RewardBundle};
use veinminer::security::RateDecision;
use veinminer::{BreakEvent, Rejection, VeinMiner, VeinMinerConfig, VeinOutcome, WorldSink};

#[derive(Default)]
struct CountingSink {
    cleared: usize,
    grants: usize,
}

impl WorldSink for CountingSink {
    fn clear_blocks(&mut self, blocks: &[BlockKey]) {
        self.cleared += blocks.len();
    }

    fn grant(&mut self, _player: &PlayerId, _bundle: &RewardBundle) {
        self.grants += 1;
    }
}

fn iron_row(n: i32) -> HashMap<BlockKey, String> {
    (0..n).map(|x| (BlockKey::new(x, 12, 0), "minecraft:iron_ore".to_owned())).collect()
}

fn base_config() -> VeinMinerConfig {
    let mut cfg = VeinMinerConfig::default();
    cfg.activation.mode = "always".to_owned();
    cfg.cooldown_ms = 0;
    cfg.statistics.auto_save_interval = 0;
    cfg
}

fn engine(cfg: VeinMinerConfig) -> VeinMiner {
    VeinMiner::new(cfg, Arc::new(DropTableMap::vanilla()), Box::new(NullStatsStore::default()))
}

fn mine(vm: &VeinMiner, ctx: PlayerMiningContext, world: &HashMap<BlockKey, String>, now: u64) -> VeinOutcome {
    let mut sink = CountingSink::default();
    vm.on_block_break(&BreakEvent::new(BlockKey::new(0, 12, 0), ctx), world, &mut sink, now)
}

fn pickaxe(player: &str) -> PlayerMiningContext {
    PlayerMiningContext::new(player, "minecraft:iron_pickaxe").with_permissions([PERMISSION_USE])
}

#[test]
fn test_iron_vein_plain_rewards() {
    let vm = engine(base_config());
    let out = mine(&vm, pickaxe("p"), &iron_row(5), 0);
    let report = out.report().unwrap();

    assert_eq!(report.vein.len(), 5);
    assert_eq!(report.bundle.count_of("minecraft:raw_iron"), 5);
    // 1 xp per ore, no bonus below 10 blocks
    assert_eq!(report.bundle.xp_awarded, 5);
    assert!(!report.bundle.smelted);
}

#[test]
fn test_bonus_xp_per_ten_blocks() {
    let mut cfg = base_config();
    cfg.mining_pattern.include_diagonals = false;
    let vm = engine(cfg);
    let report = mine(&vm, pickaxe("p"), &iron_row(10), 0).report().cloned().unwrap();
    assert_eq!(report.vein.len(), 10);
    assert_eq!(report.bundle.xp_awarded, 11);
}

#[test]
fn test_auto_smelt_gives_ingots() {
    let mut cfg = base_config();
    cfg.auto_smelt.enabled = true;
    let vm = engine(cfg);
    let out = mine(&vm, pickaxe("p"), &iron_row(5), 0);
    let bundle = &out.report().unwrap().bundle;

    assert_eq!(bundle.count_of("minecraft:iron_ingot"), 5);
    assert_eq!(bundle.count_of("minecraft:raw_iron"), 0);
    assert!(bundle.smelted);
    // 5 break xp + 5 * 0.7 * 0.5 smelt xp = 6.75
    assert_eq!(bundle.xp_awarded, 7);
}

#[test]
fn test_silk_touch_keeps_ore() {
    let mut cfg = base_config();
    cfg.auto_smelt.enabled = true;
    let vm = engine(cfg);
    let ctx = pickaxe("p").with_enchantments(Enchantments::none().with(Enchantment::SilkTouch, 1));
    let out = mine(&vm, ctx, &iron_row(5), 0);
    let bundle = &out.report().unwrap().bundle;

    assert_eq!(bundle.count_of("minecraft:iron_ore"), 5);
    assert!(!bundle.smelted);
    assert_eq!(bundle.xp_awarded, 0);
}

#[test]
fn test_silk_touch_disabled_in_config() {
    let mut cfg = base_config();
    cfg.enchantments.silk_touch = false;
    let vm = engine(cfg);
    let ctx = pickaxe("p").with_enchantments(Enchantments::none().with(Enchantment::SilkTouch, 1));
    let out = mine(&vm, ctx, &iron_row(5), 0);
    assert_eq!(out.report().unwrap().bundle.count_of("minecraft:raw_iron"), 5);
}

#[test]
fn test_minute_cap_rejects_fourth_vein() {
    let mut cfg = base_config();
    cfg.limits.enable_limits = true;
    cfg.anti_abuse.max_veins_per_minute = 3;
    let vm = engine(cfg);
    let world = iron_row(3);

    for t in 0..3 {
        assert!(mine(&vm, pickaxe("p"), &world, t * 100).report().is_some());
    }
    assert_eq!(mine(&vm, pickaxe("p"), &world, 400).rejection(), Some(Rejection::RateLimited));
    // Other players are unaffected
    assert!(mine(&vm, pickaxe("q"), &world, 400).report().is_some());
    // A new minute window admits again
    assert!(mine(&vm, pickaxe("p"), &world, 60_500).report().is_some());
}

#[test]
fn test_daily_block_cap_truncates_then_denies() {
    let mut cfg = base_config();
    cfg.limits.enable_limits = true;
    cfg.limits.max_blocks_per_day = 7;
    let vm = engine(cfg);
    let world = iron_row(5);

    let first = mine(&vm, pickaxe("p"), &world, 0);
    assert_eq!(first.report().unwrap().decision, RateDecision::Allowed(5));

    let mut sink = CountingSink::default();
    let event = BreakEvent::new(BlockKey::new(0, 12, 0), pickaxe("p"));
    let second = vm.on_block_break(&event, &world, &mut sink, 1_000);
    let report = second.report().unwrap();
    assert_eq!(report.decision, RateDecision::Truncated(2));
    assert_eq!(report.vein.len(), 2);
    assert_eq!(report.bundle.count_of("minecraft:raw_iron"), 2);
    assert_eq!(sink.cleared, 2);

    assert_eq!(mine(&vm, pickaxe("p"), &world, 2_000).rejection(), Some(Rejection::RateLimited));
    assert_eq!(vm.stats(&PlayerId::new("p")).unwrap().total_blocks, 7);
}

#[test]
fn test_burst_suspends_and_pardon_lifts() {
    let mut cfg = base_config();
    cfg.limits.enable_limits = true;
    cfg.anti_abuse.burst_limit = 2;
    let vm = engine(cfg);
    let world = iron_row(3);

    assert!(mine(&vm, pickaxe("p"), &world, 0).report().is_some());
    assert!(mine(&vm, pickaxe("p"), &world, 10).report().is_some());
    assert_eq!(mine(&vm, pickaxe("p"), &world, 20).rejection(), Some(Rejection::Suspended));
    assert_eq!(mine(&vm, pickaxe("p"), &world, 30).rejection(), Some(Rejection::Suspended));

    assert!(vm.pardon(&PlayerId::new("p")));
    assert!(mine(&vm, pickaxe("p"), &world, 40).report().is_some());
}

#[test]
fn test_per_block_permission() {
    let mut cfg = base_config();
    cfg.activation.per_block_permissions = true;
    let vm = engine(cfg);
    let world = iron_row(4);

    assert_eq!(mine(&vm, pickaxe("p"), &world, 0).rejection(), Some(Rejection::NoBlockPermission));

    let node = format!("{PERMISSION_BLOCK_PREFIX}iron_ore");
    let ctx = pickaxe("p").with_permissions([PERMISSION_USE, node.as_str()]);
    assert!(mine(&vm, ctx, &world, 0).report().is_some());
}

#[test]
fn test_block_override_disables_block() {
    let cfg = VeinMinerConfig::from_toml_str(
        r#"
        cooldown-ms = 0

        [activation]
        mode = "always"

        [blocks]
        iron_ore = false
        "#,
    )
    .unwrap();
    let vm = engine(cfg);
    assert!(matches!(mine(&vm, pickaxe("p"), &iron_row(4), 0), VeinOutcome::NotVeinBlock));
}

#[test]
fn test_max_blocks_from_toml() {
    let cfg = VeinMinerConfig::from_toml_str(
        r#"
        max-blocks = 3

        [activation]
        mode = "always"
        "#,
    )
    .unwrap();
    let vm = engine(cfg);
    let out = mine(&vm, pickaxe("p"), &iron_row(8), 0);
    assert_eq!(out.report().unwrap().vein.len(), 3);
}

#[test]
fn test_stats_persist_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = base_config();
    cfg.statistics.data_folder = dir.path().to_path_buf();
    cfg.statistics.milestones.thresholds = vec![5];
    let world = iron_row(5);

    {
        let vm = VeinMiner::from_config(cfg.clone());
        let out = mine(&vm, pickaxe("alice"), &world, 0);
        assert_eq!(out.report().unwrap().milestones, vec![5]);
    }

    let vm = VeinMiner::from_config(cfg);
    let stats = vm.stats(&PlayerId::new("alice")).unwrap();
    assert_eq!(stats.total_veins, 1);
    assert_eq!(stats.total_blocks, 5);

    // Already achieved before the restart
    let out = mine(&vm, pickaxe("alice"), &world, 1_000);
    let report = out.report().unwrap();
    assert!(report.milestones.is_empty());
    assert_eq!(report.stats.total_blocks, 10);
}

#[test]
fn test_reset_and_top_players() {
    let vm = engine(base_config());
    mine(&vm, pickaxe("a"), &iron_row(3), 0);
    mine(&vm, pickaxe("b"), &iron_row(6), 0);

    let top: Vec<String> = vm.top_players(2).into_iter().map(|(id, _)| id.0).collect();
    assert_eq!(top, vec!["b", "a"]);

    assert!(vm.reset_stats(&PlayerId::new("b")));
    assert!(vm.stats(&PlayerId::new("b")).is_none());
}

#[test]
fn test_reload_clears_cooldown() {
    let mut cfg = base_config();
    cfg.cooldown_ms = 10_000;
    let vm = engine(cfg.clone());
    let world = iron_row(3);

    assert!(mine(&vm, pickaxe("p"), &world, 0).report().is_some());
    assert_eq!(mine(&vm, pickaxe("p"), &world, 10).rejection(), Some(Rejection::Cooldown));

    vm.reload(cfg);
    assert!(mine(&vm, pickaxe("p"), &world, 20).report().is_some());
}

#[test]
fn test_persisted_totals_survive_concurrent_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = base_config();
    cfg.statistics.data_folder = dir.path().to_path_buf();
    let players = ["ann", "ben", "cat"];
    let world = iron_row(3);

    {
        let vm = VeinMiner::from_config(cfg.clone());
        std::thread::scope(|scope| {
            for name in players {
                let (vm, world) = (&vm, &world);
                scope.spawn(move || {
                    for t in 0..30 {
                        assert!(mine(vm, pickaxe(name), world, t).report().is_some());
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..15 {
                    vm.reload(cfg.clone());
                }
            });
        });
        vm.flush_stats().unwrap();
    }

    let vm = VeinMiner::from_config(cfg);
    for name in players {
        let stats = vm.stats(&PlayerId::new(name)).unwrap();
        assert_eq!(stats.total_veins, 30);
        assert_eq!(stats.total_blocks, 90);
    }
}
