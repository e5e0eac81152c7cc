//! # Vein Rate Limiting
//!
//! Per-player admission control for vein actions.
//!
//! ## Checks (in order)
//!
//! - **Suspension**: An active temporary block rejects everything
//! - **Burst**: Too many admissions in the burst window starts a suspension
//! - **Minute cap**: Veins per rolling minute window
//! - **Daily caps**: Veins per day, then blocks per day (may truncate)
//!
//! Windows roll over lazily on the next call. A cap of 0 disables it.

mod window;

pub use window::{day_start, next_day_start, DAY_MS, MINUTE_MS};

use std::collections::VecDeque;
use veinminer_core::{KeyedStore, Millis, PlayerId};

/// Limiter configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateConfig {
    /// Master switch. Off admits everything untouched.
    pub enable_limits: bool,
    /// Veins per minute window.
    pub max_veins_per_minute: u32,
    /// Veins per day.
    pub max_veins_per_day: u32,
    /// Blocks per day.
    pub max_blocks_per_day: u64,
    /// Day boundary, milliseconds past midnight UTC.
    pub daily_reset_offset_ms: Millis,
    /// Admissions allowed inside one burst window.
    pub burst_limit: u32,
    /// Burst window length.
    pub burst_window_ms: Millis,
    /// Suspension length in minutes.
    pub temporary_block_duration_minutes: u64,
    /// Warn when a player is suspended.
    pub log_suspicious_activity: bool,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            enable_limits: false,
            max_veins_per_minute: 60,
            max_veins_per_day: 1000,
            max_blocks_per_day: 10_000,
            daily_reset_offset_ms: 0,
            burst_limit: 20,
            burst_window_ms: 5_000,
            temporary_block_duration_minutes: 5,
            log_suspicious_activity: true,
        }
    }
}

impl RateConfig {
    fn suspension_ms(&self) -> Millis {
        self.temporary_block_duration_minutes.saturating_mul(MINUTE_MS)
    }
}

/// Outcome of one admission request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateDecision {
    /// The whole vein may be mined.
    Allowed(usize),
    /// Only this many blocks may be mined.
    Truncated(usize),
    /// A cap is reached.
    Denied,
    /// The player is serving a temporary block.
    TemporarilySuspended,
}

impl RateDecision {
    /// Blocks that may be mined, if any.
    #[must_use]
    pub fn admitted(self) -> Option<usize> {
        match self {
            Self::Allowed(n) | Self::Truncated(n) => Some(n),
            Self::Denied | Self::TemporarilySuspended => None,
        }
    }
}

/// Per-player limiter state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateState {
    /// Start of the current minute window.
    pub minute_window_start: Millis,
    /// Veins admitted in the minute window.
    pub minute_count: u32,
    /// Start of the current day window.
    pub day_window_start: Millis,
    /// Veins admitted today.
    pub day_count: u32,
    /// Blocks admitted today.
    pub day_blocks: u64,
    /// Admission times inside the burst window, oldest first.
    pub burst: VecDeque<Millis>,
    /// End of the active suspension.
    pub suspended_until: Option<Millis>,
}

impl RateState {
    fn roll(&mut self, now: Millis, config: &RateConfig) {
        if window::minute_elapsed(self.minute_window_start, now) {
            self.minute_window_start = now;
            self.minute_count = 0;
        }
        let today = day_start(now, config.daily_reset_offset_ms);
        if today != self.day_window_start {
            self.day_window_start = today;
            self.day_count = 0;
            self.day_blocks = 0;
        }
        while self.burst.front().is_some_and(|&t| now.saturating_sub(t) >= config.burst_window_ms) {
            self.burst.pop_front();
        }
    }

    fn is_suspended_at(&self, now: Millis) -> bool {
        self.suspended_until.is_some_and(|until| now < until)
    }
}

/// Per-player vein rate limiter.
pub struct RateLimiter {
    config: RateConfig,
    players: KeyedStore<PlayerId, RateState>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("enabled", &self.config.enable_limits)
            .field("players", &self.players.len())
            .finish()
    }
}

impl RateLimiter {
    /// Creates a limiter with no tracked players.
    #[must_use]
    pub fn new(config: RateConfig) -> Self {
        Self { config, players: KeyedStore::new() }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Replaces the configuration, keeping every player's state.
    pub fn set_config(&mut self, config: RateConfig) {
        self.config = config;
    }

    /// Decides how much of a vein the player may mine, recording usage
    /// for whatever is admitted.
    pub fn admit(&self, player: &PlayerId, vein_size: usize, now: Millis) -> RateDecision {
        if !self.config.enable_limits {
            return RateDecision::Allowed(vein_size);
        }
        let config = &self.config;

        self.players.with(player, RateState::default, |state| {
            if state.is_suspended_at(now) {
                return RateDecision::TemporarilySuspended;
            }
            if state.suspended_until.take().is_some() {
                state.burst.clear();
                tracing::debug!(player = %player, "temporary block expired");
            }

            state.roll(now, config);

            if config.burst_limit > 0 && state.burst.len() >= config.burst_limit as usize {
                let until = now.saturating_add(config.suspension_ms());
                state.suspended_until = Some(until);
                if config.log_suspicious_activity {
                    tracing::warn!(
                        player = %player,
                        admissions = state.burst.len(),
                        window_ms = config.burst_window_ms,
                        minutes = config.temporary_block_duration_minutes,
                        "vein mining burst detected, player temporarily blocked"
                    );
                }
                return RateDecision::TemporarilySuspended;
            }

            if config.max_veins_per_minute > 0 && state.minute_count >= config.max_veins_per_minute {
                return RateDecision::Denied;
            }
            if config.max_veins_per_day > 0 && state.day_count >= config.max_veins_per_day {
                return RateDecision::Denied;
            }

            let mut decision = RateDecision::Allowed(vein_size);
            if config.max_blocks_per_day > 0 {
                let left = config.max_blocks_per_day.saturating_sub(state.day_blocks);
                if left == 0 {
                    return RateDecision::Denied;
                }
                if (vein_size as u64) > left {
                    decision = RateDecision::Truncated(left as usize);
                }
            }

            let admitted = decision.admitted().unwrap_or(0);
            state.minute_count += 1;
            state.day_count += 1;
            state.day_blocks += admitted as u64;
            state.burst.push_back(now);
            decision
        })
    }

    /// True while the player's temporary block is active.
    #[must_use]
    pub fn is_suspended(&self, player: &PlayerId, now: Millis) -> bool {
        self.config.enable_limits
            && self.players.with_existing(player, |s| s.is_suspended_at(now)).unwrap_or(false)
    }

    /// End of the player's active suspension.
    #[must_use]
    pub fn suspended_until(&self, player: &PlayerId, now: Millis) -> Option<Millis> {
        self.players
            .with_existing(player, |s| s.suspended_until.filter(|&until| now < until))
            .flatten()
    }

    /// Snapshot of a player's state.
    #[must_use]
    pub fn state(&self, player: &PlayerId) -> Option<RateState> {
        self.players.with_existing(player, |s| s.clone())
    }

    /// Forgets a player, lifting any suspension.
    pub fn reset(&self, player: &PlayerId) -> bool {
        self.players.remove(player)
    }
}
