//! Per-thread turn serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use switchboard_types::conversation::ThreadId;

/// Idle lock entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Hands out one async mutex per thread id.
///
/// Holding the guard for a whole turn makes concurrent turns on the same
/// thread run one after another; different threads never contend.
#[derive(Default)]
pub struct ThreadLocks {
    locks: DashMap<ThreadId, Arc<Mutex<()>>>,
}

impl ThreadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, thread_id: &ThreadId) -> OwnedMutexGuard<()> {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        let lock = self
            .locks
            .entry(thread_id.clone())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
