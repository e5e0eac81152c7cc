//! # Configuration
//!
//! The plugin file, parsed once per reload into an immutable
//! [`VeinMinerConfig`]. Unknown keys are ignored and missing keys take
//! their defaults. Out-of-range values are replaced with a warning rather
//! than rejected.
//!
//! ```toml
//! max-blocks = 64
//! cooldown-ms = 100
//!
//! [mining-pattern]
//! pattern = "sphere"
//! radius = 3
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use veinminer_core::pattern::{MAX_RADIUS, MAX_RANGE};
use veinminer_core::{BlockFilter, CategoryToggles, Millis, MiningPattern, SearchLimits, SAFETY_CAP};
use veinminer_economy::{
    AutoSmeltConfig, DurabilityConfig, EnchantConfig, MilestoneBasis, MilestoneConfig, RewardConfig,
    StatsConfig, StorageKind, StoreConfig, XpConfig, DEFAULT_MILESTONES,
};
use veinminer_security::RateConfig;

const DEFAULT_MAX_BLOCKS: i64 = 64;
const DEFAULT_MIN_VEIN: i64 = 2;
const DEFAULT_COOLDOWN_MS: i64 = 100;
const DEFAULT_BATCH: i64 = 10;
const MAX_BATCH: i64 = 100;
const DEFAULT_REACH: f64 = 100.0;
const DEFAULT_AUTO_SAVE_SECS: i64 = 300;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// When a block break starts a vein.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivationMode {
    /// Only while sneaking.
    #[default]
    Sneak,
    /// Only while not sneaking.
    Stand,
    /// Always.
    Always,
}

impl ActivationMode {
    /// Parses a mode name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sneak" => Some(Self::Sneak),
            "stand" => Some(Self::Stand),
            "always" => Some(Self::Always),
            _ => None,
        }
    }

    /// True if a player in this posture may start a vein.
    #[must_use]
    pub fn permits(self, sneaking: bool) -> bool {
        match self {
            Self::Sneak => sneaking,
            Self::Stand => !sneaking,
            Self::Always => true,
        }
    }
}

/// `[activation]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActivationSection {
    /// `sneak`, `stand` or `always`.
    pub mode: String,
    /// Require `veinminer.blocks.<id>` per block type.
    pub per_block_permissions: bool,
    /// Require the matching tool category.
    pub require_correct_tool: bool,
    /// Farthest a vein block may be from the origin.
    pub max_reach_distance: f64,
}

impl Default for ActivationSection {
    fn default() -> Self {
        Self {
            mode: "sneak".to_owned(),
            per_block_permissions: false,
            require_correct_tool: true,
            max_reach_distance: DEFAULT_REACH,
        }
    }
}

/// `[mining-pattern]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PatternSection {
    /// `adjacent`, `cube`, `sphere`, `vertical` or `horizontal`.
    pub pattern: String,
    /// Cube and sphere radius.
    pub radius: i64,
    /// Diagonal neighbors for adjacent and horizontal.
    pub include_diagonals: bool,
    /// Vertical column range.
    pub vertical_range: i64,
    /// Horizontal plane range.
    pub horizontal_range: i64,
}

impl Default for PatternSection {
    fn default() -> Self {
        Self {
            pattern: "adjacent".to_owned(),
            radius: 1,
            include_diagonals: true,
            vertical_range: 4,
            horizontal_range: 4,
        }
    }
}

const PATTERN_NAMES: [&str; 5] = ["adjacent", "cube", "sphere", "vertical", "horizontal"];

/// `[enchantments]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EnchantSection {
    /// Honor Silk Touch.
    pub silk_touch: bool,
    /// Honor Fortune.
    pub fortune: bool,
}

impl Default for EnchantSection {
    fn default() -> Self {
        Self { silk_touch: true, fortune: true }
    }
}

/// `[auto-smelt]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AutoSmeltSection {
    /// Master switch.
    pub enabled: bool,
    /// Smelt only with Fortune.
    pub require_fortune: bool,
    /// Award furnace XP.
    pub give_xp: bool,
    /// Furnace XP scale.
    pub xp_multiplier: f64,
    /// Block ids allowed to smelt. Empty allows all.
    pub whitelist: Vec<String>,
}

impl Default for AutoSmeltSection {
    fn default() -> Self {
        let d = AutoSmeltConfig::default();
        Self {
            enabled: d.enabled,
            require_fortune: d.require_fortune,
            give_xp: d.give_xp,
            xp_multiplier: d.xp_multiplier,
            whitelist: Vec::new(),
        }
    }
}

/// `[tool-durability]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DurabilitySection {
    /// Wear per block.
    pub multiplier: f64,
    /// Apply Unbreaking.
    pub respect_unbreaking: bool,
    /// Allow the tool to break.
    pub break_on_exceed: bool,
}

impl Default for DurabilitySection {
    fn default() -> Self {
        Self { multiplier: 1.0, respect_unbreaking: true, break_on_exceed: true }
    }
}

/// `[experience]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExperienceSection {
    /// Master switch.
    pub enabled: bool,
    /// Break XP per ore, scaled by each ore's table weight.
    pub base_ore_xp: u32,
    /// Break XP per log.
    pub log_xp: u32,
    /// Break XP per leaf.
    pub leaf_xp: u32,
    /// Award the vein-size bonus.
    pub bonus_enabled: bool,
    /// Bonus granularity.
    pub bonus_per_blocks: i64,
    /// Bonus per granule.
    pub bonus_amount: u32,
}

impl Default for ExperienceSection {
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

/// `[limits]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LimitsSection {
    /// Master switch for every limit.
    pub enable_limits: bool,
    /// Veins per day, 0 for no cap.
    pub max_veins_per_day: i64,
    /// Blocks per day, 0 for no cap.
    pub max_blocks_per_day: i64,
    /// Day boundary past midnight UTC.
    pub daily_reset_offset_ms: i64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self { enable_limits: false, max_veins_per_day: 1000, max_blocks_per_day: 10_000, daily_reset_offset_ms: 0 }
    }
}

/// `[anti-abuse]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AntiAbuseSection {
    /// Veins per minute, 0 for no cap.
    pub max_veins_per_minute: i64,
    /// Suspension minutes.
    pub temporary_block_duration: i64,
    /// Admissions per burst window, 0 disables burst detection.
    pub burst_limit: i64,
    /// Burst window length.
    pub burst_window_ms: i64,
    /// Warn on suspensions.
    pub log_suspicious_activity: bool,
}

impl Default for AntiAbuseSection {
    fn default() -> Self {
        Self {
            max_veins_per_minute: 60,
            temporary_block_duration: 5,
            burst_limit: 20,
            burst_window_ms: 5_000,
            log_suspicious_activity: true,
        }
    }
}

/// `[statistics.milestones]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MilestonesSection {
    /// Report crossings.
    pub enabled: bool,
    /// `total-blocks` or `total-veins`.
    pub basis: MilestoneBasis,
    /// Thresholds, sorted on load.
    pub thresholds: Vec<u64>,
}

impl Default for MilestonesSection {
    fn default() -> Self {
        Self { enabled: true, basis: MilestoneBasis::TotalBlocks, thresholds: DEFAULT_MILESTONES.to_vec() }
    }
}

/// `[statistics.sqlite]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SqliteSection {
    /// Database file, relative to the data folder.
    pub path: PathBuf,
    /// Table name prefix.
    pub table_prefix: String,
}

impl Default for SqliteSection {
    fn default() -> Self {
        let d = StoreConfig::default();
        Self { path: d.sqlite_path, table_prefix: d.table_prefix }
    }
}

/// `[statistics]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StatisticsSection {
    /// Track statistics.
    pub enabled: bool,
    /// `file` or `sqlite`.
    pub storage: String,
    /// Fall back to the flat file when sqlite fails.
    pub save_to_file: bool,
    /// Seconds between saves, 0 saves after every vein.
    pub auto_save_interval: i64,
    /// Folder for stats files.
    pub data_folder: PathBuf,
    /// Milestones.
    pub milestones: MilestonesSection,
    /// SQLite backend.
    pub sqlite: SqliteSection,
}

impl Default for StatisticsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            storage: "file".to_owned(),
            save_to_file: true,
            auto_save_interval: DEFAULT_AUTO_SAVE_SECS,
            data_folder: StoreConfig::default().data_folder,
            milestones: MilestonesSection::default(),
            sqlite: SqliteSection::default(),
        }
    }
}

/// `[enabled-blocks]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledBlocksSection {
    /// Ores.
    pub ores: bool,
    /// Logs.
    pub logs: bool,
    /// Leaves.
    pub leaves: bool,
}

impl Default for EnabledBlocksSection {
    fn default() -> Self {
        Self { ores: true, logs: true, leaves: true }
    }
}

/// The whole configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VeinMinerConfig {
    /// Vein size cap. -1 selects the safety cap.
    pub max_blocks: i64,
    /// Smallest vein treated as a vein.
    pub min_vein_size: i64,
    /// Minimum time between two veins of one player.
    pub cooldown_ms: i64,
    /// Blocks handed to the world per batch.
    pub batch_size: i64,
    /// Worlds where vein mining is off.
    pub disabled_worlds: Vec<String>,
    /// Extra drop table merged over the vanilla one.
    pub drop_table: Option<PathBuf>,
    /// `[activation]`
    pub activation: ActivationSection,
    /// `[mining-pattern]`
    pub mining_pattern: PatternSection,
    /// `[enchantments]`
    pub enchantments: EnchantSection,
    /// `[auto-smelt]`
    pub auto_smelt: AutoSmeltSection,
    /// `[tool-durability]`
    pub tool_durability: DurabilitySection,
    /// `[experience]`
    pub experience: ExperienceSection,
    /// `[limits]`
    pub limits: LimitsSection,
    /// `[anti-abuse]`
    pub anti_abuse: AntiAbuseSection,
    /// `[statistics]`
    pub statistics: StatisticsSection,
    /// `[enabled-blocks]`
    pub enabled_blocks: EnabledBlocksSection,
    /// `[blocks]` per-block overrides, e.g. `IRON_ORE = false`.
    pub blocks: BTreeMap<String, bool>,
}

impl Default for VeinMinerConfig {
    fn default() -> Self {
        Self {
            max_blocks: DEFAULT_MAX_BLOCKS,
            min_vein_size: DEFAULT_MIN_VEIN,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            batch_size: DEFAULT_BATCH,
            disabled_worlds: Vec::new(),
            drop_table: None,
            activation: ActivationSection::default(),
            mining_pattern: PatternSection::default(),
            enchantments: EnchantSection::default(),
            auto_smelt: AutoSmeltSection::default(),
            tool_durability: DurabilitySection::default(),
            experience: ExperienceSection::default(),
            limits: LimitsSection::default(),
            anti_abuse: AntiAbuseSection::default(),
            statistics: StatisticsSection::default(),
            enabled_blocks: EnabledBlocksSection::default(),
            blocks: BTreeMap::new(),
        }
    }
}

/// Replaces `*value` with `default` and warns when `invalid` holds.
fn replace_if<T: std::fmt::Display + Copy>(key: &str, value: &mut T, default: T, invalid: impl FnOnce(T) -> bool) {
    if invalid(*value) {
        tracing::warn!(key, value = %value, default = %default, "invalid config value, using default");
        *value = default;
    }
}

fn clamp_i64(key: &str, value: &mut i64, lo: i64, hi: i64) {
    let clamped = (*value).clamp(lo, hi);
    if clamped != *value {
        tracing::warn!(key, value = *value, clamped, "config value out of range, clamping");
        *value = clamped;
    }
}

fn non_negative(v: i64, default: u64) -> u64 {
    u64::try_from(v).unwrap_or(default)
}

impl VeinMinerConfig {
    /// Parses and sanitizes a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed or a
    /// value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text)?;
        config.sanitize();
        Ok(config)
    }

    /// Reads, parses and sanitizes a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an IO or parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Fails only on values TOML cannot represent.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Replaces every out-of-range value. Idempotent.
    pub fn sanitize(&mut self) {
        let cap = SAFETY_CAP as i64;
        if self.max_blocks == -1 {
            tracing::warn!(cap, "max-blocks is -1 (unlimited), applying safety cap");
            self.max_blocks = cap;
        }
        replace_if("max-blocks", &mut self.max_blocks, DEFAULT_MAX_BLOCKS, |v| !(1..=cap).contains(&v));
        replace_if("min-vein-size", &mut self.min_vein_size, DEFAULT_MIN_VEIN, |v| v < 1);
        replace_if("cooldown-ms", &mut self.cooldown_ms, DEFAULT_COOLDOWN_MS, |v| v < 0);
        replace_if("batch-size", &mut self.batch_size, DEFAULT_BATCH, |v| !(1..=MAX_BATCH).contains(&v));

        let act = &mut self.activation;
        if ActivationMode::parse(&act.mode).is_none() {
            tracing::warn!(mode = %act.mode, "invalid activation mode, using sneak");
            act.mode = "sneak".to_owned();
        }
        act.mode.make_ascii_lowercase();
        replace_if("activation.max-reach-distance", &mut act.max_reach_distance, DEFAULT_REACH, |v| {
            v.is_nan() || v < 1.0
        });

        let pat = &mut self.mining_pattern;
        pat.pattern.make_ascii_lowercase();
        if !PATTERN_NAMES.contains(&pat.pattern.as_str()) {
            tracing::warn!(pattern = %pat.pattern, "invalid mining pattern, using adjacent");
            pat.pattern = "adjacent".to_owned();
        }
        clamp_i64("mining-pattern.radius", &mut pat.radius, 1, i64::from(MAX_RADIUS));
        clamp_i64("mining-pattern.vertical-range", &mut pat.vertical_range, 1, i64::from(MAX_RANGE));
        clamp_i64("mining-pattern.horizontal-range", &mut pat.horizontal_range, 1, i64::from(MAX_RANGE));

        let smelt = &mut self.auto_smelt;
        replace_if("auto-smelt.xp-multiplier", &mut smelt.xp_multiplier, 0.5, |v| v.is_nan() || v < 0.0);
        smelt.whitelist.retain(|id| !id.trim().is_empty());
        for id in &mut smelt.whitelist {
            *id = normalize_block_id(id);
        }

        replace_if("tool-durability.multiplier", &mut self.tool_durability.multiplier, 1.0, |v| {
            v.is_nan() || v < 0.0
        });
        replace_if("experience.bonus-per-blocks", &mut self.experience.bonus_per_blocks, 10, |v| v < 1);

        let limits = &mut self.limits;
        replace_if("limits.max-veins-per-day", &mut limits.max_veins_per_day, 1000, |v| v < 0);
        replace_if("limits.max-blocks-per-day", &mut limits.max_blocks_per_day, 10_000, |v| v < 0);
        replace_if("limits.daily-reset-offset-ms", &mut limits.daily_reset_offset_ms, 0, |v| v < 0);

        let abuse = &mut self.anti_abuse;
        replace_if("anti-abuse.max-veins-per-minute", &mut abuse.max_veins_per_minute, 60, |v| v < 0);
        replace_if("anti-abuse.temporary-block-duration", &mut abuse.temporary_block_duration, 5, |v| v < 1);
        replace_if("anti-abuse.burst-limit", &mut abuse.burst_limit, 20, |v| v < 0);
        replace_if("anti-abuse.burst-window-ms", &mut abuse.burst_window_ms, 5_000, |v| v < 0);

        let stats = &mut self.statistics;
        stats.storage.make_ascii_lowercase();
        if !matches!(stats.storage.as_str(), "file" | "sqlite") {
            tracing::warn!(storage = %stats.storage, "unknown statistics storage, using file");
            stats.storage = "file".to_owned();
        }
        replace_if("statistics.auto-save-interval", &mut stats.auto_save_interval, DEFAULT_AUTO_SAVE_SECS, |v| {
            v < 0
        });
        let thresholds = &mut stats.milestones.thresholds;
        thresholds.retain(|&t| t > 0);
        thresholds.sort_unstable();
        thresholds.dedup();
    }

    /// Parsed activation mode.
    #[must_use]
    pub fn activation_mode(&self) -> ActivationMode {
        ActivationMode::parse(&self.activation.mode).unwrap_or_default()
    }

    /// True if vein mining is off in this world.
    #[must_use]
    pub fn is_world_disabled(&self, world: &str) -> bool {
        self.disabled_worlds.iter().any(|w| w == world)
    }

    /// Cooldown between veins.
    #[must_use]
    pub fn cooldown(&self) -> Millis {
        non_negative(self.cooldown_ms, DEFAULT_COOLDOWN_MS as u64)
    }

    /// Auto-save period. Zero means save after every vein.
    #[must_use]
    pub fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(non_negative(self.statistics.auto_save_interval, DEFAULT_AUTO_SAVE_SECS as u64))
    }

    /// The configured neighborhood.
    #[must_use]
    pub fn pattern(&self) -> MiningPattern {
        let p = &self.mining_pattern;
        let small = |v: i64| u8::try_from(v).unwrap_or(u8::MAX);
        let pattern = match p.pattern.as_str() {
            "cube" => MiningPattern::cube(small(p.radius)),
            "sphere" => MiningPattern::sphere(small(p.radius)),
            "vertical" => MiningPattern::vertical(small(p.vertical_range)),
            "horizontal" => MiningPattern::horizontal(small(p.horizontal_range), p.include_diagonals),
            _ => MiningPattern::adjacent(p.include_diagonals),
        };
        pattern.clamped()
    }

    /// Search budget and bounds.
    #[must_use]
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_blocks: self.max_blocks,
            min_vein_size: usize::try_from(self.min_vein_size).unwrap_or(2),
            batch_size: usize::try_from(self.batch_size).unwrap_or(10),
            reach_distance: Some(self.activation.max_reach_distance),
            ..SearchLimits::default()
        }
    }

    /// Reward sections.
    #[must_use]
    pub fn reward_config(&self) -> RewardConfig {
        let x = &self.experience;
        RewardConfig {
            enchant: EnchantConfig { silk_touch: self.enchantments.silk_touch, fortune: self.enchantments.fortune },
            auto_smelt: AutoSmeltConfig {
                enabled: self.auto_smelt.enabled,
                require_fortune: self.auto_smelt.require_fortune,
                give_xp: self.auto_smelt.give_xp,
                xp_multiplier: self.auto_smelt.xp_multiplier,
                whitelist: self.auto_smelt.whitelist.clone(),
            },
            durability: DurabilityConfig {
                multiplier: self.tool_durability.multiplier,
                respect_unbreaking: self.tool_durability.respect_unbreaking,
                break_on_exceed: self.tool_durability.break_on_exceed,
            },
            xp: XpConfig {
                enabled: x.enabled,
                base_ore_xp: x.base_ore_xp,
                log_xp: x.log_xp,
                leaf_xp: x.leaf_xp,
                bonus_enabled: x.bonus_enabled,
                bonus_per_blocks: u32::try_from(x.bonus_per_blocks).unwrap_or(10),
                bonus_amount: x.bonus_amount,
            },
        }
    }

    /// Limiter settings.
    #[must_use]
    pub fn rate_config(&self) -> RateConfig {
        let l = &self.limits;
        let a = &self.anti_abuse;
        let small = |v: i64, d: u32| u32::try_from(v).unwrap_or(d);
        RateConfig {
            enable_limits: l.enable_limits,
            max_veins_per_minute: small(a.max_veins_per_minute, 60),
            max_veins_per_day: small(l.max_veins_per_day, 1000),
            max_blocks_per_day: non_negative(l.max_blocks_per_day, 10_000),
            daily_reset_offset_ms: non_negative(l.daily_reset_offset_ms, 0),
            burst_limit: small(a.burst_limit, 20),
            burst_window_ms: non_negative(a.burst_window_ms, 5_000),
            temporary_block_duration_minutes: non_negative(a.temporary_block_duration, 5),
            log_suspicious_activity: a.log_suspicious_activity,
        }
    }

    /// Statistics settings.
    #[must_use]
    pub fn stats_config(&self) -> StatsConfig {
        let m = &self.statistics.milestones;
        StatsConfig {
            enabled: self.statistics.enabled,
            milestones: MilestoneConfig { enabled: m.enabled, basis: m.basis, thresholds: m.thresholds.clone() },
        }
    }

    /// Store selection.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        let s = &self.statistics;
        StoreConfig {
            kind: if s.storage == "sqlite" { StorageKind::Sqlite } else { StorageKind::File },
            save_to_file: s.save_to_file,
            data_folder: s.data_folder.clone(),
            sqlite_path: s.sqlite.path.clone(),
            table_prefix: s.sqlite.table_prefix.clone(),
        }
    }

    /// Blocks that may start a vein.
    #[must_use]
    pub fn block_filter(&self) -> BlockFilter {
        let e = &self.enabled_blocks;
        let overrides = self.blocks.iter().map(|(k, v)| (k.to_ascii_uppercase(), *v)).collect();
        BlockFilter::new(CategoryToggles { ores: e.ores, logs: e.logs, leaves: e.leaves }, &overrides)
    }
}

/// Lower-case short id: `"minecraft:Iron_Ore"` becomes `"iron_ore"`.
fn normalize_block_id(id: &str) -> String {
    veinminer_core::short_id(id.trim()).to_ascii_lowercase()
}
