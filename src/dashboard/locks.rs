//! Per-key mutual exclusion.
//!
//! Used to keep at most one status edit in flight per order while edits to
//! different orders still run side by side.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A lazily populated set of async locks, one per key
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no one else holds `key`, then hold it until the guard drops
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Entries only the map still references are idle
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_waits() {
        let locks = KeyedLocks::new();
        let held = locks.lock("o1").await;

        let blocked = tokio::time::timeout(Duration::from_millis(20), locks.lock("o1")).await;
        assert!(blocked.is_err());

        drop(held);
        let reacquired = tokio::time::timeout(Duration::from_millis(20), locks.lock("o1")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _first = locks.lock("o1").await;

        let second = tokio::time::timeout(Duration::from_millis(20), locks.lock("o2")).await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_keys_are_pruned() {
        let locks = KeyedLocks::new();
        drop(locks.lock("o1").await);
        drop(locks.lock("o2").await);

        let _held = locks.lock("o3").await;
        assert_eq!(locks.len(), 1);
    }
}
