//! In-Flight Gate Module
//!
//! Per-key async gates that serialize overlapping calls for the same key.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

use crate::memoize::lock_unpoisoned;

type Gate = Arc<AsyncMutex<()>>;

// == In-Flight Table ==
/// One gate per key with a call currently running or waiting.
#[derive(Debug)]
pub(crate) struct InFlightTable<K> {
    gates: Mutex<HashMap<K, Gate>>,
}

impl<K> Default for InFlightTable<K> {
    fn default() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> InFlightTable<K>
where
    K: Hash + Eq + Clone,
{
    // == Enter ==
    /// Waits until no other call holds the gate for `key`, then holds it
    /// until the returned guard is dropped.
    pub(crate) async fn enter(&self, key: &K) -> InFlightGuard<'_, K> {
        let gate = Arc::clone(lock_unpoisoned(&self.gates).entry(key.clone()).or_default());

        // Built before awaiting so a cancelled waiter still cleans up
        let mut guard = InFlightGuard {
            table: self,
            key: key.clone(),
            gate,
            permit: None,
        };
        guard.permit = Some(Arc::clone(&guard.gate).lock_owned().await);
        guard
    }

    // == Length ==
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        lock_unpoisoned(&self.gates).len()
    }
}

// == In-Flight Guard ==
/// Holds a key's gate; the last holder removes the gate from the table.
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a, K>
where
    K: Hash + Eq + Clone,
{
    table: &'a InFlightTable<K>,
    key: K,
    gate: Gate,
    permit: Option<OwnedMutexGuard<()>>,
}

impl<K> Drop for InFlightGuard<'_, K>
where
    K: Hash + Eq + Clone,
{
    fn drop(&mut self) {
        self.permit.take();

        let mut gates = lock_unpoisoned(&self.table.gates);
        // Callers clone under the table lock, so two means only the table and this guard remain
        if Arc::strong_count(&self.gate) == 2 {
            if let Some(gate) = gates.get(&self.key) {
                if Arc::ptr_eq(gate, &self.gate) {
                    gates.remove(&self.key);
                    trace!("released in-flight gate");
                }
            }
        }
    }
}
