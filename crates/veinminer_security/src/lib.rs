//! # VeinMiner Security
//!
//! Server-side limits on how often, and how much, a player may vein-mine.
//!
//! ## Architecture
//!
//! ```text
//! VeinSearch ──► Vein (n blocks)
//!                    │
//!                    ▼
//!             ┌──────────────┐
//!             │ RateLimiter  │  per-player RateState
//!             └──────────────┘
//!                    │
//!      Allowed(n) / Truncated(k) / Denied / TemporarilySuspended
//! ```
//!
//! The limiter never fails. Every outcome is a [`RateDecision`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod rate_limit;

pub use rate_limit::{RateConfig, RateDecision, RateLimiter, RateState, DAY_MS, MINUTE_MS};
