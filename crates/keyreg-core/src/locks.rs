//! Per-key async locks.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table size above which idle entries are dropped on the next acquire
const PRUNE_THRESHOLD: usize = 1024;

/// Table of async mutexes, one per key
///
/// Serializes check-then-act sequences on the same key while distinct keys
/// proceed in parallel. An entry is idle once no guard or waiter holds it.
pub struct IdentityLocks<K> {
    entries: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> IdentityLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty lock table
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `key`
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn acquire(&self, key: &K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut entries = self.entries();
            if entries.len() >= PRUNE_THRESHOLD {
                prune_idle(&mut entries);
            }
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        lock.lock_owned().await
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no keys are tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, Arc<AsyncMutex<()>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K> Default for IdentityLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Drop entries that only the table references
fn prune_idle<K>(entries: &mut HashMap<K, Arc<AsyncMutex<()>>>) {
    entries.retain(|_, lock| Arc::strong_count(lock) > 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(IdentityLocks::<String>::new());
        let key = "tenant/customer".to_string();

        let guard = locks.acquire(&key).await;

        let contender = {
            let locks = Arc::clone(&locks);
            let key = key.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&key).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(5), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let locks = IdentityLocks::<u64>::new();

        let _first = locks.acquire(&1).await;
        let second = tokio::time::timeout(Duration::from_secs(1), locks.acquire(&2)).await;

        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = IdentityLocks::<usize>::new();
        let held = locks.acquire(&0).await;

        for key in 1..(PRUNE_THRESHOLD * 2) {
            drop(locks.acquire(&key).await);
        }

        assert!(locks.len() <= PRUNE_THRESHOLD + 1);

        // The held entry survives pruning
        let entries = locks.entries();
        assert!(entries.contains_key(&0));
        drop(entries);
        drop(held);
    }
}
