//! # VeinMiner
//!
//! Break one block of a connected cluster, and the whole cluster goes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            VeinMiner                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐    │
//! │  │ veinminer_core │   │   _security    │   │   _economy     │    │
//! │  │                │──>│                │──>│                │    │
//! │  │ • Classifier   │   │ • RateLimiter  │   │ • Drop tables  │    │
//! │  │ • Patterns     │   │ • Burst guard  │   │ • Rewards      │    │
//! │  │ • VeinSearch   │   │                │   │ • Stats/stores │    │
//! │  └────────────────┘   └────────────────┘   └────────────────┘    │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: The plugin configuration file
//! - `engine`: The block-break pipeline

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod engine;

// Re-export the engine crates
pub use veinminer_core as core;
pub use veinminer_economy as economy;
pub use veinminer_security as security;

// Re-export commonly used types
pub use config::{ActivationMode, ConfigError, VeinMinerConfig};
pub use engine::{BreakEvent, Rejection, VeinMiner, VeinOutcome, VeinReport, WorldSink};
