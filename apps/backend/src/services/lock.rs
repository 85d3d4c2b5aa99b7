//! Keyed exclusive locks for session creation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock key: one lock per (user_id, dictionary_id) pair.
pub type LockKey = (i64, i64);

/// Held lock; released on drop.
pub struct SessionLockGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Registry of per-key exclusive locks.
///
/// Backed by an in-process map of async mutexes. The acquire/release
/// contract is what matters: a database-level exclusive lock (e.g. a
/// Postgres advisory lock on the same key pair) can stand in for
/// multi-process deployments. Entries are never evicted; the map grows
/// with the number of distinct keys ever locked.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for a key, waiting while it is held.
    pub async fn acquire(&self, key: LockKey) -> SessionLockGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        SessionLockGuard {
            _guard: lock.lock_owned().await,
        }
    }
}
