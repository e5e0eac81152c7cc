//! Background statistics writer.
//!
//! ```text
//!   record() ──► dirty set ──┐
//!                            ├──► [Saver Thread] ── every interval ──► StatsStore
//!   flush()  ────────────────┘        (single writer)
//! ```
//!
//! An interval of zero disables the thread; `after_record` then saves
//! synchronously. Failed writes put their players back into the dirty set.

use super::{StatsRecord, StatsStore};
use crate::error::StoreResult;
use crate::stats::StatsAggregator;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Shared {
    stats: Arc<StatsAggregator>,
    store: Arc<dyn StatsStore>,
    /// `true` once shutdown is requested.
    shutdown: Mutex<bool>,
    wake: Condvar,
    /// Serializes writes between the thread and `flush`.
    write_lock: Mutex<()>,
    saved: AtomicU64,
}

impl Shared {
    fn save_dirty(&self) -> StoreResult<usize> {
        let _w = self.write_lock.lock();
        let dirty = self.stats.take_dirty();
        if dirty.is_empty() {
            return Ok(0);
        }
        let records: Vec<StatsRecord> = dirty.into_iter().map(StatsRecord::from).collect();
        match self.store.write(&records) {
            Ok(()) => {
                self.saved.fetch_add(records.len() as u64, Ordering::Relaxed);
                Ok(records.len())
            }
            Err(e) => {
                self.stats.mark_dirty(records.into_iter().map(|r| r.player_id));
                Err(e)
            }
        }
    }

    fn save_logged(&self) {
        if let Err(e) = self.save_dirty() {
            tracing::error!(store = self.store.name(), error = %e, "failed to save statistics");
        }
    }
}

/// Periodic statistics persistence.
pub struct AutoSaver {
    shared: Arc<Shared>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("store", &self.shared.store.name())
            .field("interval", &self.interval)
            .field("saved", &self.saved())
            .finish()
    }
}

impl AutoSaver {
    /// Starts the saver. `interval == 0` saves after every record instead.
    #[must_use]
    pub fn start(stats: Arc<StatsAggregator>, store: Arc<dyn StatsStore>, interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            stats,
            store,
            shutdown: Mutex::new(false),
            wake: Condvar::new(),
            write_lock: Mutex::new(()),
            saved: AtomicU64::new(0),
        });

        let handle = (!interval.is_zero()).then(|| {
            let worker = Arc::clone(&shared);
            thread::spawn(move || Self::saver_loop(&worker, interval))
        });

        Self { shared, interval, handle }
    }

    fn saver_loop(shared: &Shared, interval: Duration) {
        loop {
            {
                let mut stop = shared.shutdown.lock();
                if !*stop {
                    shared.wake.wait_for(&mut stop, interval);
                }
                if *stop {
                    break;
                }
            }
            shared.save_logged();
        }
    }

    /// Hook for the caller after each recorded vein.
    pub fn after_record(&self) {
        if self.handle.is_none() {
            self.shared.save_logged();
        }
    }

    /// Saves every pending change now.
    ///
    /// # Errors
    ///
    /// The store's write error. The changes stay pending.
    pub fn flush(&self) -> StoreResult<usize> {
        self.shared.save_dirty()
    }

    /// Records written since start.
    #[must_use]
    pub fn saved(&self) -> u64 {
        self.shared.saved.load(Ordering::Relaxed)
    }

    /// Name of the backing store.
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.shared.store.name()
    }

    /// True if a background thread is running.
    #[must_use]
    pub fn is_periodic(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        *self.shared.shutdown.lock() = true;
        self.shared.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.shared.save_logged();
    }
}
