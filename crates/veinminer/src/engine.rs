//! # Vein Mining Pipeline
//!
//! [`VeinMiner`] runs one block-break event end to end:
//!
//! ```text
//! BreakEvent ─► gates ─► VeinSearch ─► RateLimiter ─► RewardEngine ─► WorldSink
//!                                                                 └─► StatsAggregator ─► AutoSaver
//! ```
//!
//! Every stage reads the same configuration snapshot. An event holds the
//! runtime read lock from its first gate to its stats record, and `reload`
//! takes the write lock, so a reload waits for in-flight events and no event
//! straddles two runtimes.

use crate::config::VeinMinerConfig;
use parking_lot::RwLock;
use siphasher::sip::SipHasher24;
use std::hash::Hasher;
use std::sync::Arc;
use veinminer_core::{
    classify, short_id, BlockFilter, BlockKey, BlockOracle, KeyedStore, Millis, PlayerId,
    PlayerMiningContext, SearchLimits, Vein, VeinSearch, PERMISSION_BLOCK_PREFIX, PERMISSION_USE,
};
use veinminer_economy::{
    open_store, AutoSaver, DropTable, DropTableMap, PlayerStats, RewardBundle, RewardConfig,
    RewardEngine, StatsAggregator, StatsStore, StoreConfig, StoreResult,
};
use veinminer_security::{RateDecision, RateLimiter};

/// Where broken blocks and rewards go.
///
/// Calls are fire-and-forget; the engine does not wait on their effects.
pub trait WorldSink {
    /// Removes blocks from the world. Called once per batch.
    fn clear_blocks(&mut self, blocks: &[BlockKey]);

    /// Hands the rewards to the player.
    fn grant(&mut self, player: &PlayerId, bundle: &RewardBundle);
}

/// A player broke a block.
#[derive(Clone, Debug)]
pub struct BreakEvent {
    /// The broken block.
    pub origin: BlockKey,
    /// Player, tool and posture at the time of the break.
    pub context: PlayerMiningContext,
}

impl BreakEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(origin: BlockKey, context: PlayerMiningContext) -> Self {
        Self { origin, context }
    }
}

/// Why an event did not become a vein.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The player is serving a temporary block.
    Suspended,
    /// Missing `veinminer.use`.
    NoPermission,
    /// The player turned vein mining off.
    ToggledOff,
    /// Another vein of this player is in progress.
    AlreadyProcessing,
    /// Too soon after the previous vein.
    Cooldown,
    /// Vein mining is off in this world.
    DisabledWorld,
    /// Activation posture not met.
    NotActivated,
    /// Missing `veinminer.blocks.<id>`.
    NoBlockPermission,
    /// The held tool does not fit the block.
    WrongTool,
    /// A rate cap is reached.
    RateLimited,
}

/// A mined vein.
#[derive(Clone, Debug)]
pub struct VeinReport {
    /// Blocks broken, in discovery order.
    pub vein: Vein,
    /// What the player received.
    pub bundle: RewardBundle,
    /// Limiter decision for this vein.
    pub decision: RateDecision,
    /// Milestones crossed by this vein.
    pub milestones: Vec<u64>,
    /// Player stats after this vein.
    pub stats: PlayerStats,
}

/// Result of one break event.
#[derive(Clone, Debug)]
pub enum VeinOutcome {
    /// The vein was broken and rewarded.
    Mined(VeinReport),
    /// The block cannot start a vein. The break proceeds normally.
    NotVeinBlock,
    /// The vein is below the minimum size. The break proceeds normally.
    SingleBlock,
    /// A gate refused the vein.
    Rejected(Rejection),
}

impl VeinOutcome {
    /// The report, if a vein was mined.
    #[must_use]
    pub fn report(&self) -> Option<&VeinReport> {
        match self {
            Self::Mined(r) => Some(r),
            _ => None,
        }
    }

    /// The rejection, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
struct Session {
    enabled: bool,
    processing: bool,
    last_vein_at: Option<Millis>,
}

impl Default for Session {
    fn default() -> Self {
        Self { enabled: true, processing: false, last_vein_at: None }
    }
}

/// Clears the processing flag when an event ends, however it ends.
struct ProcessingGuard<'a> {
    sessions: &'a KeyedStore<PlayerId, Session>,
    player: &'a PlayerId,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.sessions.with_existing(self.player, |s| s.processing = false);
    }
}

/// Everything derived from one configuration.
struct Runtime {
    config: Arc<VeinMinerConfig>,
    search: VeinSearch,
    limits: SearchLimits,
    rewards: RewardConfig,
    filter: BlockFilter,
    engine: RewardEngine,
    store_config: StoreConfig,
    store: Arc<dyn StatsStore>,
    stats: Arc<StatsAggregator>,
    saver: AutoSaver,
}

impl Runtime {
    fn build(
        config: VeinMinerConfig,
        table: Arc<dyn DropTable>,
        store: Arc<dyn StatsStore>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        let saver = AutoSaver::start(Arc::clone(&stats), Arc::clone(&store), config.auto_save_interval());
        Self {
            search: VeinSearch::new(config.pattern()),
            limits: config.search_limits(),
            rewards: config.reward_config(),
            filter: config.block_filter(),
            engine: RewardEngine::new(table),
            store_config: config.store_config(),
            store,
            stats,
            saver,
            config: Arc::new(config),
        }
    }
}

/// The vein mining engine.
pub struct VeinMiner {
    runtime: RwLock<Arc<Runtime>>,
    table: Arc<dyn DropTable>,
    limiter: RwLock<RateLimiter>,
    sessions: KeyedStore<PlayerId, Session>,
}

impl std::fmt::Debug for VeinMiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rt = self.runtime();
        f.debug_struct("VeinMiner")
            .field("pattern", &rt.search.pattern())
            .field("saver", &rt.saver)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

fn load_stats(config: &VeinMinerConfig, store: &dyn StatsStore) -> StatsAggregator {
    let records = store.load_all().unwrap_or_else(|e| {
        tracing::warn!(store = store.name(), error = %e, "failed to load statistics, starting empty");
        Vec::new()
    });
    tracing::info!(store = store.name(), players = records.len(), "statistics loaded");
    StatsAggregator::with_records(config.stats_config(), records.into_iter().map(|r| (r.player_id, r.stats)))
}

impl VeinMiner {
    /// Creates an engine over a drop table and a statistics store.
    ///
    /// Stored statistics are loaded once here.
    #[must_use]
    pub fn new(config: VeinMinerConfig, table: Arc<dyn DropTable>, store: Box<dyn StatsStore>) -> Self {
        let store: Arc<dyn StatsStore> = Arc::from(store);
        let stats = Arc::new(load_stats(&config, store.as_ref()));
        let limiter = RateLimiter::new(config.rate_config());
        let runtime = Runtime::build(config, Arc::clone(&table), store, stats);
        Self {
            runtime: RwLock::new(Arc::new(runtime)),
            table,
            limiter: RwLock::new(limiter),
            sessions: KeyedStore::new(),
        }
    }

    /// Creates an engine with the vanilla drops (plus the configured drop
    /// table file, if any) and the configured statistics store.
    #[must_use]
    pub fn from_config(config: VeinMinerConfig) -> Self {
        let mut table = DropTableMap::vanilla();
        if let Some(path) = &config.drop_table {
            match DropTableMap::load(path) {
                Ok(extra) => {
                    tracing::info!(path = %path.display(), blocks = extra.blocks.len(), "drop table loaded");
                    table = table.merged(extra);
                }
                Err(e) => tracing::warn!(error = %e, "failed to load drop table, using vanilla drops"),
            }
        }
        let store = open_store(&config.store_config());
        Self::new(config, Arc::new(table), store)
    }

    fn runtime(&self) -> Arc<Runtime> {
        Arc::clone(&self.runtime.read())
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<VeinMinerConfig> {
        Arc::clone(&self.runtime().config)
    }

    /// Handles one block break.
    ///
    /// # Arguments
    ///
    /// * `event` - The break and the player's context
    /// * `oracle` - World snapshot the vein is searched in
    /// * `sink` - Receives block removals and rewards
    /// * `now` - Current time
    pub fn on_block_break(
        &self,
        event: &BreakEvent,
        oracle: &dyn BlockOracle,
        sink: &mut dyn WorldSink,
        now: Millis,
    ) -> VeinOutcome {
        let outcome = self.process(event, oracle, sink, now);
        match &outcome {
            VeinOutcome::Rejected(reason) => {
                tracing::debug!(player = %event.context.player_id, origin = %event.origin, ?reason, "vein rejected");
            }
            VeinOutcome::SingleBlock => {
                tracing::debug!(player = %event.context.player_id, origin = %event.origin, "vein below minimum size");
            }
            VeinOutcome::NotVeinBlock | VeinOutcome::Mined(_) => {}
        }
        outcome
    }

    fn process(
        &self,
        event: &BreakEvent,
        oracle: &dyn BlockOracle,
        sink: &mut dyn WorldSink,
        now: Millis,
    ) -> VeinOutcome {
        use VeinOutcome::Rejected;

        let rt = self.runtime.read();
        let cfg = &rt.config;
        let ctx = &event.context;
        let player = &ctx.player_id;

        if self.limiter.read().is_suspended(player, now) {
            return Rejected(Rejection::Suspended);
        }
        if !ctx.has_permission(PERMISSION_USE) {
            return Rejected(Rejection::NoPermission);
        }

        let cooldown = cfg.cooldown();
        let claimed = self.sessions.with(player, Session::default, |s| {
            if !s.enabled {
                return Err(Rejection::ToggledOff);
            }
            if s.processing {
                return Err(Rejection::AlreadyProcessing);
            }
            if s.last_vein_at.is_some_and(|last| now.saturating_sub(last) < cooldown) {
                return Err(Rejection::Cooldown);
            }
            s.processing = true;
            Ok(())
        });
        if let Err(reason) = claimed {
            return Rejected(reason);
        }
        let _guard = ProcessingGuard { sessions: &self.sessions, player };

        if cfg.is_world_disabled(&ctx.world) {
            return Rejected(Rejection::DisabledWorld);
        }
        if !cfg.activation_mode().permits(ctx.sneaking) {
            return Rejected(Rejection::NotActivated);
        }

        let Some(block_id) = oracle.block_at(event.origin) else {
            return VeinOutcome::NotVeinBlock;
        };
        if !rt.filter.allows(block_id) {
            return VeinOutcome::NotVeinBlock;
        }
        if cfg.activation.per_block_permissions
            && !ctx.has_permission(&format!("{PERMISSION_BLOCK_PREFIX}{}", short_id(block_id)))
        {
            return Rejected(Rejection::NoBlockPermission);
        }

        let require_tool = cfg.activation.require_correct_tool;
        let tool = ctx.tool_traits();
        if require_tool && !classify(block_id).1.is_satisfied_by(tool) {
            return Rejected(Rejection::WrongTool);
        }

        let mut limits = rt.limits.clone();
        if let Some(reach) = ctx.reach_distance {
            limits.reach_distance = Some(limits.reach_distance.map_or(reach, |r| r.min(reach)));
        }
        let mut vein = rt.search.run(event.origin, oracle, &limits, require_tool, tool);
        if !limits.accepts(&vein) {
            return VeinOutcome::SingleBlock;
        }
        let found = vein.len();

        let decision = self.limiter.read().admit(player, found, now);
        match decision {
            RateDecision::Allowed(_) => {}
            RateDecision::Truncated(n) => vein.truncate_to(n),
            RateDecision::Denied => return Rejected(Rejection::RateLimited),
            RateDecision::TemporarilySuspended => return Rejected(Rejection::Suspended),
        }

        let seed = action_seed(player, event.origin, now);
        let bundle = rt.engine.compute(&vein, oracle, ctx, &rt.rewards, seed);

        for batch in vein.batches(limits.batch_size) {
            sink.clear_blocks(batch);
        }
        sink.grant(player, &bundle);

        let update = rt.stats.record(player, vein.len(), now);
        rt.saver.after_record();
        for milestone in &update.newly_crossed {
            tracing::info!(player = %player, milestone, "vein mining milestone reached");
        }

        self.sessions.with_existing(player, |s| s.last_vein_at = Some(now));

        tracing::info!(
            player = %player,
            block = block_id,
            size = vein.len(),
            found,
            xp = bundle.xp_awarded,
            "vein mined"
        );
        if bundle.tool_broken {
            tracing::debug!(player = %player, tool = %ctx.tool_id, "tool broke during vein");
        }

        VeinOutcome::Mined(VeinReport {
            vein,
            bundle,
            decision,
            milestones: update.newly_crossed,
            stats: update.stats,
        })
    }

    /// Turns vein mining on or off for a player.
    pub fn set_enabled(&self, player: &PlayerId, enabled: bool) {
        self.sessions.with(player, Session::default, |s| s.enabled = enabled);
        tracing::debug!(player = %player, enabled, "vein mining toggled");
    }

    /// Flips a player's toggle. Returns the new state.
    pub fn toggle(&self, player: &PlayerId) -> bool {
        let enabled = self.sessions.with(player, Session::default, |s| {
            s.enabled = !s.enabled;
            s.enabled
        });
        tracing::debug!(player = %player, enabled, "vein mining toggled");
        enabled
    }

    /// True unless the player turned vein mining off.
    #[must_use]
    pub fn is_enabled(&self, player: &PlayerId) -> bool {
        self.sessions.with_existing(player, |s| s.enabled).unwrap_or(true)
    }

    /// Applies a new configuration.
    ///
    /// Cooldowns are cleared and limiter state is kept. Statistics are
    /// flushed first; a changed store setting opens the new store and
    /// copies every player into it. Blocks until in-flight events finish.
    pub fn reload(&self, config: VeinMinerConfig) {
        let mut slot = self.runtime.write();
        let old = Arc::clone(&slot);
        if let Err(e) = old.saver.flush() {
            tracing::error!(error = %e, "failed to save statistics before reload");
        }

        let store_config = config.store_config();
        let (store, migrate) = if store_config == old.store_config {
            (Arc::clone(&old.store), false)
        } else {
            (Arc::from(open_store(&store_config)), true)
        };
        let stats = Arc::new(StatsAggregator::with_records(config.stats_config(), old.stats.snapshot()));
        if migrate {
            stats.mark_dirty(stats.snapshot().into_iter().map(|(id, _)| id));
        }

        self.limiter.write().set_config(config.rate_config());
        let runtime = Runtime::build(config, Arc::clone(&self.table), store, stats);
        *slot = Arc::new(runtime);
        self.clear_cooldowns();
        drop(slot);

        // Stops the old saver
        drop(old);
        tracing::info!("configuration reloaded");
    }

    fn clear_cooldowns(&self) {
        for (id, _) in self.sessions.snapshot() {
            self.sessions.with_existing(&id, |s| s.last_vein_at = None);
        }
    }

    /// Writes pending statistics now.
    ///
    /// # Errors
    ///
    /// The store's write error. Pending changes are kept for the next save.
    pub fn flush_stats(&self) -> StoreResult<usize> {
        self.runtime.read().saver.flush()
    }

    /// A player's lifetime statistics.
    #[must_use]
    pub fn stats(&self, player: &PlayerId) -> Option<PlayerStats> {
        self.runtime.read().stats.get(player)
    }

    /// Top players by lifetime blocks.
    #[must_use]
    pub fn top_players(&self, n: usize) -> Vec<(PlayerId, PlayerStats)> {
        self.runtime.read().stats.top_by_blocks(n)
    }

    /// Clears a player's statistics.
    pub fn reset_stats(&self, player: &PlayerId) -> bool {
        self.runtime.read().stats.reset(player)
    }

    /// Lifts a player's suspension and clears their limiter windows.
    pub fn pardon(&self, player: &PlayerId) -> bool {
        self.limiter.read().reset(player)
    }
}

/// SipHash keys for action seeds. Changing them changes every roll.
const SEED_KEYS: (u64, u64) = (0x7665_696e_6d69_6e65, 0x7365_6564_5f76_3031);

/// Seed for one action's random draws.
///
/// SipHash-2-4 over fixed little-endian bytes, so a seed is the same on
/// every platform and toolchain.
fn action_seed(player: &PlayerId, origin: BlockKey, now: Millis) -> u64 {
    let mut h = SipHasher24::new_with_keys(SEED_KEYS.0, SEED_KEYS.1);
    h.write(player.as_str().as_bytes());
    h.write(&[0xff]);
    h.write(&origin.x.to_le_bytes());
    h.write(&origin.y.to_le_bytes());
    h.write(&origin.z.to_le_bytes());
    h.write(&now.to_le_bytes());
    h.finish()
}
