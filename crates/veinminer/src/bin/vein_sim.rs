//! # Vein Mining Simulation
//!
//! Runs the full break pipeline against a small fabricated world:
//! an iron vein, an oak tree, and a few players with different tools.
//!
//! ```bash
//! cargo run --bin vein_sim
//! cargo run --bin vein_sim -- path/to/config.toml
//! RUST_LOG=veinminer=debug cargo run --bin vein_sim
//! ```
//!
//! Without a config path the engine runs on defaults with statistics kept
//! in memory only.

use std::collections::{BTreeMap, HashMap};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use veinminer::core::{
    BlockKey, Enchantment, Enchantments, PlayerId, PlayerMiningContext, ToolState, PERMISSION_USE,
};
use veinminer::economy::{DropTableMap, NullStatsStore, RewardBundle};
use veinminer::{BreakEvent, VeinMiner, VeinMinerConfig, VeinOutcome, WorldSink};

/// Applies removals to the world and keeps a per-player inventory.
#[derive(Default)]
struct SimSink {
    cleared: Vec<BlockKey>,
    batches: usize,
    inventory: BTreeMap<String, BTreeMap<String, u64>>,
    xp: BTreeMap<String, u64>,
}

impl WorldSink for SimSink {
    fn clear_blocks(&mut self, blocks: &[BlockKey]) {
        self.cleared.extend_from_slice(blocks);
        self.batches += 1;
    }

    fn grant(&mut self, player: &PlayerId, bundle: &RewardBundle) {
        let items = self.inventory.entry(player.0.clone()).or_default();
        for drop in &bundle.drops {
            *items.entry(drop.item.clone()).or_insert(0) += u64::from(drop.count);
        }
        *self.xp.entry(player.0.clone()).or_insert(0) += u64::from(bundle.xp_awarded);
    }
}

impl SimSink {
    fn apply(&mut self, world: &mut HashMap<BlockKey, String>) {
        for key in self.cleared.drain(..) {
            world.remove(&key);
        }
    }
}

/// An iron blob around (0, 12, 0) and an oak tree at (20, 64, 20).
fn build_world() -> HashMap<BlockKey, String> {
    let mut world = HashMap::new();

    for x in 0..3 {
        for z in 0..3 {
            world.insert(BlockKey::new(x, 12, z), "minecraft:iron_ore".to_owned());
        }
    }
    world.insert(BlockKey::new(1, 13, 1), "minecraft:iron_ore".to_owned());
    world.insert(BlockKey::new(1, 11, 1), "minecraft:deepslate_iron_ore".to_owned());
    world.insert(BlockKey::new(5, 12, 0), "minecraft:stone".to_owned());

    for y in 64..70 {
        world.insert(BlockKey::new(20, y, 20), "minecraft:oak_log".to_owned());
    }
    for x in 18..=22 {
        for z in 18..=22 {
            if x != 20 || z != 20 {
                world.insert(BlockKey::new(x, 68, z), "minecraft:oak_leaves".to_owned());
            }
        }
    }

    world
}

fn player(id: &str, tool: &str) -> PlayerMiningContext {
    PlayerMiningContext::new(id, tool).with_permissions([PERMISSION_USE]).sneaking(true)
}

fn describe(label: &str, outcome: &VeinOutcome, sink: &SimSink) {
    match outcome {
        VeinOutcome::Mined(report) => {
            let drops: Vec<String> =
                report.bundle.coalesced().iter().map(|d| format!("{}x {}", d.count, d.item)).collect();
            println!(
                "  {label}: mined {} blocks in {} batches, {} xp, durability -{}{} [{}]",
                report.vein.len(),
                sink.batches,
                report.bundle.xp_awarded,
                report.bundle.durability_cost,
                if report.bundle.tool_broken { " (tool broke)" } else { "" },
                drops.join(", ")
            );
            for m in &report.milestones {
                println!("    milestone reached: {m}");
            }
        }
        VeinOutcome::NotVeinBlock => println!("  {label}: not a vein block, normal break"),
        VeinOutcome::SingleBlock => println!("  {label}: vein too small, normal break"),
        VeinOutcome::Rejected(reason) => println!("  {label}: rejected ({reason:?})"),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let started = Instant::now();

    // ===== CONFIGURATION =====
    let vm = match std::env::args().nth(1) {
        Some(path) => match VeinMinerConfig::load(&path) {
            Ok(config) => VeinMiner::from_config(config),
            Err(e) => {
                eprintln!("failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => VeinMiner::new(
            VeinMinerConfig::default(),
            Arc::new(DropTableMap::vanilla()),
            Box::new(NullStatsStore::default()),
        ),
    };
    let cooldown = vm.config().cooldown();
    println!("VeinMiner simulation ({:?})", vm.config().activation_mode());

    let mut world = build_world();
    let mut sink = SimSink::default();
    let mut now = 1_000;
    let mut step = |label: &str, ctx: PlayerMiningContext, origin: BlockKey, world: &mut HashMap<BlockKey, String>| {
        sink.batches = 0;
        let outcome = vm.on_block_break(&BreakEvent::new(origin, ctx), &*world, &mut sink, now);
        describe(label, &outcome, &sink);
        sink.apply(world);
        now += cooldown + 1;
    };

    // ===== STEP 1: Wrong posture and wrong tool =====
    println!("\n[1] gates");
    step("standing", player("alex", "minecraft:iron_pickaxe").sneaking(false), BlockKey::new(0, 12, 0), &mut world);
    step("with axe", player("alex", "minecraft:iron_axe"), BlockKey::new(0, 12, 0), &mut world);
    step("stone", player("alex", "minecraft:iron_pickaxe"), BlockKey::new(5, 12, 0), &mut world);

    // ===== STEP 2: Iron vein with Fortune III =====
    println!("\n[2] iron vein");
    let pick = player("alex", "minecraft:diamond_pickaxe")
        .with_enchantments(Enchantments::none().with(Enchantment::Fortune, 3).with(Enchantment::Unbreaking, 1))
        .with_tool_state(ToolState { max_durability: 1561, damage: 0, unbreakable: false });
    step("fortune III", pick, BlockKey::new(1, 12, 1), &mut world);

    // ===== STEP 3: Oak tree =====
    println!("\n[3] oak tree");
    step("trunk", player("steve", "minecraft:iron_axe"), BlockKey::new(20, 64, 20), &mut world);
    step("canopy", player("steve", "minecraft:shears"), BlockKey::new(18, 68, 18), &mut world);

    // ===== STEP 4: Player toggle =====
    println!("\n[4] toggle");
    vm.set_enabled(&PlayerId::new("steve"), false);
    step("toggled off", player("steve", "minecraft:iron_axe"), BlockKey::new(20, 64, 20), &mut world);

    // ===== RESULTS =====
    println!("\n[results]");
    for (name, items) in &sink.inventory {
        let xp = sink.xp.get(name).copied().unwrap_or(0);
        println!("  {name}: {xp} xp");
        for (item, count) in items {
            println!("    {count:>4} {item}");
        }
    }
    for (id, stats) in vm.top_players(5) {
        println!(
            "  {id}: {} veins, {} blocks, largest {}",
            stats.total_veins, stats.total_blocks, stats.largest_vein
        );
    }
    if let Err(e) = vm.flush_stats() {
        eprintln!("failed to save statistics: {e}");
        return ExitCode::FAILURE;
    }
    println!("  {} blocks left in world, finished in {:?}", world.len(), started.elapsed());

    ExitCode::SUCCESS
}
