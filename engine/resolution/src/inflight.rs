//! Per-key coalescing of concurrent resolutions.
//!
//! The first caller for a key takes the key's async mutex and performs the
//! fetch; later callers for the same key wait on that mutex and then find the
//! record in the cache. The synchronous map lock is only held to look up or
//! drop a slot, never across an `.await`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

struct Slot {
    lock: Arc<AsyncMutex<()>>,
    // Holders plus waiters, including waiters that have not been polled yet.
    users: usize,
}

/// Table of in-progress resolutions keyed by `K`.
pub(crate) struct InFlight<K> {
    slots: Mutex<HashMap<K, Slot>>,
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    pub(crate) fn new() -> Self { Self { slots: Mutex::new(HashMap::new()) } }

    /// Waits until no other caller holds `key`, then holds it.
    ///
    /// Dropping the returned future before it completes releases the caller's
    /// registration, so an abandoned wait never strands the slot.
    pub(crate) async fn acquire(&self, key: K) -> FlightGuard<'_, K> {
        let (registration, lock) = self.register(key);
        let permit = lock.lock_owned().await;
        FlightGuard { _permit: permit, _registration: registration }
    }

    fn register(&self, key: K) -> (Registration<'_, K>, Arc<AsyncMutex<()>>) {
        let mut slots = self.slots.lock();
        let slot = slots
            .entry(key.clone())
            .or_insert_with(|| Slot { lock: Arc::new(AsyncMutex::new(())), users: 0 });
        slot.users += 1;
        let lock = Arc::clone(&slot.lock);
        (Registration { owner: self, key }, lock)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize { self.slots.lock().len() }
}

/// One caller's claim on a slot, counted until dropped.
struct Registration<'a, K: Eq + Hash> {
    owner: &'a InFlight<K>,
    key: K,
}

impl<K: Eq + Hash> Drop for Registration<'_, K> {
    fn drop(&mut self) {
        let mut slots = self.owner.slots.lock();
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.users -= 1;
            if slot.users == 0 {
                slots.remove(&self.key);
            }
        }
    }
}

/// Held while a resolution for one key is in progress.
///
/// The permit is released before the registration is counted down.
pub(crate) struct FlightGuard<'a, K: Eq + Hash> {
    _permit: OwnedMutexGuard<()>,
    _registration: Registration<'a, K>,
}
