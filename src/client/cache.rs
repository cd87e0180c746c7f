use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::record::RecordSummary;

struct Snapshot {
    generation: u64,
    items: Vec<RecordSummary>,
}

/// Last reconstructed listing, ascending by id.
///
/// Not authoritative. Every write bumps the generation, which drops the
/// snapshot and keeps a scan that started before the write from storing
/// its result.
#[derive(Default)]
pub(crate) struct RecordCache {
    generation: AtomicU64,
    snapshot: RwLock<Option<Snapshot>>,
}

impl RecordCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub(crate) fn get(&self) -> Option<Vec<RecordSummary>> {
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        snapshot
            .as_ref()
            .filter(|snapshot| snapshot.generation == self.generation())
            .map(|snapshot| snapshot.items.clone())
    }

    /// Store `items` if no write happened since `generation` was read.
    pub(crate) fn store(&self, generation: u64, items: &[RecordSummary]) -> bool {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if generation != self.generation() {
            return false;
        }
        *snapshot = Some(Snapshot {
            generation,
            items: items.to_vec(),
        });
        true
    }

    pub(crate) fn invalidate(&self) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        *snapshot = None;
    }
}
