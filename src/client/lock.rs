use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::record::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum WriteKey {
    /// All creates share one slot so the assigned id can be inferred.
    Create,
    Record(RecordId),
}

type Slot = Arc<AsyncMutex<()>>;

/// Per-key async locks serializing this client's writes.
///
/// A second write to the same record waits until the first is confirmed.
/// Slots only live while a write holds or waits on them.
#[derive(Default)]
pub(crate) struct WriteLocks {
    slots: Mutex<HashMap<WriteKey, Slot>>,
}

impl WriteLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn acquire(&self, key: WriteKey) -> WriteGuard<'_> {
        let slot = Arc::clone(self.slots().entry(key).or_default());
        WriteGuard {
            locks: self,
            guard: Some(slot.lock_owned().await),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<WriteKey, Slot>> {
        // the map only holds lock handles, so a poisoned map is still usable
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every slot nobody holds or waits on. Handles are only cloned
    /// under the map lock, so a count of one means the map owns the last one.
    fn prune(&self) {
        self.slots().retain(|_, slot| Arc::strong_count(slot) > 1);
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self, key: WriteKey) -> bool {
        self.slots()
            .get(&key)
            .map(|slot| slot.try_lock().is_err())
            .unwrap_or(false)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots().len()
    }
}

/// Held for the duration of one write. Releases the key on drop.
pub(crate) struct WriteGuard<'a> {
    locks: &'a WriteLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.prune();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_waits() {
        let locks = Arc::new(WriteLocks::new());
        let guard = locks.acquire(WriteKey::Record(1)).await;
        assert!(locks.is_locked(WriteKey::Record(1)));

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(WriteKey::Record(1)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(!locks.is_locked(WriteKey::Record(1)));
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = WriteLocks::new();
        let _one = locks.acquire(WriteKey::Record(1)).await;
        let _two = locks.acquire(WriteKey::Record(2)).await;
        let _create = locks.acquire(WriteKey::Create).await;
        assert!(locks.is_locked(WriteKey::Record(1)));
        assert!(locks.is_locked(WriteKey::Record(2)));
        assert!(locks.is_locked(WriteKey::Create));
    }

    #[tokio::test]
    async fn released_slots_are_dropped() {
        let locks = WriteLocks::new();
        for id in 0..1_000 {
            let _guard = locks.acquire(WriteKey::Record(id)).await;
            assert_eq!(locks.len(), 1);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn slot_survives_while_a_writer_waits() {
        let locks = Arc::new(WriteLocks::new());
        let first = locks.acquire(WriteKey::Record(7)).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(WriteKey::Record(7)).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        // the waiter still shares the slot, so the key stays serialized
        assert_eq!(locks.len(), 1);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(locks.is_locked(WriteKey::Record(7)));

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn cancelled_waiter_does_not_leak_its_slot() {
        let locks = WriteLocks::new();
        let held = locks.acquire(WriteKey::Record(3)).await;

        let cancelled = tokio::time::timeout(
            Duration::from_millis(10),
            locks.acquire(WriteKey::Record(3)),
        )
        .await;
        assert!(cancelled.is_err());

        drop(held);
        let _other = locks.acquire(WriteKey::Record(4)).await;
        assert_eq!(locks.len(), 1);
    }
}
