use alloy_primitives::B256;
use async_trait::async_trait;

use super::error::StoreError;
use crate::fingerprint::Fingerprint;
use crate::record::{EditRecord, Record, RecordId};

/// Confirmation of a committed write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteReceipt {
    pub tx: B256,
    /// Id the store assigned, when it can report one (creates only).
    pub record_id: Option<RecordId>,
}

/// The append-only ledger holding records and their edit logs.
///
/// Every method is a round-trip to an external system. Writes resolve only
/// once the transaction is committed (or definitively failed); an
/// implementation must never leave a partial write observable.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a new record with the next sequential id.
    async fn create(
        &self,
        fingerprint: Fingerprint,
        source_locator: &str,
    ) -> Result<WriteReceipt, StoreError>;

    /// Append one edit to `id` and replace its current fingerprint.
    async fn amend(
        &self,
        id: RecordId,
        fingerprint: Fingerprint,
        note: &str,
    ) -> Result<WriteReceipt, StoreError>;

    /// Highest assigned id. Zero for an empty store.
    async fn total_count(&self) -> Result<u64, StoreError>;

    async fn record_meta(&self, id: RecordId) -> Result<Record, StoreError>;

    async fn edit_count(&self, id: RecordId) -> Result<u64, StoreError>;

    /// `index` must be below the record's edit count.
    async fn edit(&self, id: RecordId, index: u64) -> Result<EditRecord, StoreError>;
}
