//! SharedStore handle
//!
//! The store itself has no internal locking; this wrapper is the single
//! mutual-exclusion boundary every caller must go through. The lock is
//! load-bearing for correctness, not an optimization: overlapping mutations
//! would race on the same snapshot files.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;

use super::{PersistentStore, StoreStats};

/// Cloneable, lock-guarded handle to a [`PersistentStore`]
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<PersistentStore>>,
}

impl SharedStore {
    /// Open or create the underlying store
    pub fn open(config: Config) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(PersistentStore::open(config)?)),
        })
    }

    /// Run a closure against the store under the lock
    pub fn with<R>(&self, f: impl FnOnce(&mut PersistentStore) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    /// Collection sizes for diagnostics
    pub fn stats(&self) -> StoreStats {
        self.inner.lock().get_stats()
    }

    /// Persistence self-check: snapshot everything, reload a scratch store
    /// from the same directory, and compare collection sizes. Surfaces the
    /// IO and corruption failures that mutations only log.
    pub fn verify_persistence(&self) -> Result<bool> {
        let store = self.inner.lock();
        store.save_all()?;

        let reloaded = PersistentStore::open(store.config().clone())?;
        Ok(reloaded.get_stats() == store.get_stats())
    }
}
