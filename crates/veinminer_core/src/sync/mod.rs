//! # Synchronization Primitives
//!
//! Per-player state is sharded by key. There is no global lock around a
//! player's action, only a short read lock to find that player's slot.
//!
//! ```text
//! admit(alice) ──► read lock ──► alice slot ──► Mutex<RateState>
//! admit(bob)   ──► read lock ──► bob slot   ──► Mutex<RateState>
//!                  (shared)                      (independent)
//! ```

mod keyed;

pub use keyed::KeyedStore;
