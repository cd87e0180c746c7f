use std::sync::{Arc, RwLock};

use alloy_primitives::{keccak256, Address, B256};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use super::error::StoreError;
use super::store::{RecordStore, WriteReceipt};
use crate::fingerprint::Fingerprint;
use crate::record::{EditRecord, Principal, Record, RecordId};

#[derive(Clone, Debug)]
struct Entry {
    record: Record,
    edits: Vec<EditRecord>,
}

#[derive(Debug, Default)]
struct Ledger {
    // entries[i] holds record id i + 1
    entries: Vec<Entry>,
    tx_count: u64,
}

impl Ledger {
    fn entry(&self, id: RecordId) -> Result<&Entry, StoreError> {
        id.checked_sub(1)
            .and_then(|index| self.entries.get(index as usize))
            .ok_or(StoreError::UnknownRecord(id))
    }

    fn entry_mut(&mut self, id: RecordId) -> Result<&mut Entry, StoreError> {
        id.checked_sub(1)
            .and_then(|index| self.entries.get_mut(index as usize))
            .ok_or(StoreError::UnknownRecord(id))
    }

    fn next_tx(&mut self, signer: &Principal) -> B256 {
        self.tx_count += 1;
        let mut preimage = Vec::with_capacity(28);
        preimage.extend_from_slice(signer.as_slice());
        preimage.extend_from_slice(&self.tx_count.to_be_bytes());
        keccak256(&preimage)
    }
}

/// Ledger kept in process memory.
///
/// Clone-friendly: clones share the same ledger. Each handle signs writes
/// as its own principal (see [`InMemoryRecordStore::with_signer`]).
#[derive(Clone, Debug)]
pub struct InMemoryRecordStore {
    ledger: Arc<RwLock<Ledger>>,
    signer: Principal,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_signer_address(Address::ZERO)
    }

    pub fn with_signer_address(signer: Principal) -> Self {
        InMemoryRecordStore {
            ledger: Arc::new(RwLock::new(Ledger::default())),
            signer,
        }
    }

    /// Handle over the same ledger that writes as `signer`.
    pub fn with_signer(&self, signer: Principal) -> Self {
        InMemoryRecordStore {
            ledger: Arc::clone(&self.ledger),
            signer,
        }
    }

    pub fn signer(&self) -> Principal {
        self.signer
    }

    fn now() -> DateTime<Utc> {
        // ledger timestamps have second precision
        Utc::now().trunc_subsecs(0)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(
        &self,
        fingerprint: Fingerprint,
        source_locator: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let mut ledger = self
            .ledger
            .write()
            .map_err(|_| StoreError::LockPoisoned("create"))?;

        let id = ledger.entries.len() as RecordId + 1;
        ledger.entries.push(Entry {
            record: Record {
                id,
                fingerprint,
                source_locator: source_locator.to_string(),
                creator: self.signer,
                created_at: Self::now(),
                edit_count: 0,
            },
            edits: Vec::new(),
        });
        let tx = ledger.next_tx(&self.signer);

        Ok(WriteReceipt {
            tx,
            record_id: Some(id),
        })
    }

    async fn amend(
        &self,
        id: RecordId,
        fingerprint: Fingerprint,
        note: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let mut ledger = self
            .ledger
            .write()
            .map_err(|_| StoreError::LockPoisoned("amend"))?;

        let editor = self.signer;
        let entry = ledger.entry_mut(id)?;
        let edit = EditRecord {
            index: entry.edits.len() as u64,
            timestamp: Self::now(),
            previous_fingerprint: entry.record.fingerprint,
            editor,
            note: note.to_string(),
        };
        entry.edits.push(edit);
        entry.record.fingerprint = fingerprint;
        entry.record.edit_count = entry.edits.len() as u64;
        let tx = ledger.next_tx(&editor);

        Ok(WriteReceipt {
            tx,
            record_id: None,
        })
    }

    async fn total_count(&self) -> Result<u64, StoreError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| StoreError::LockPoisoned("total count"))?;
        Ok(ledger.entries.len() as u64)
    }

    async fn record_meta(&self, id: RecordId) -> Result<Record, StoreError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| StoreError::LockPoisoned("record meta"))?;
        Ok(ledger.entry(id)?.record.clone())
    }

    async fn edit_count(&self, id: RecordId) -> Result<u64, StoreError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| StoreError::LockPoisoned("edit count"))?;
        Ok(ledger.entry(id)?.record.edit_count)
    }

    async fn edit(&self, id: RecordId, index: u64) -> Result<EditRecord, StoreError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| StoreError::LockPoisoned("edit"))?;
        let entry = ledger.entry(id)?;
        entry
            .edits
            .get(index as usize)
            .cloned()
            .ok_or(StoreError::EditOutOfRange {
                id,
                index,
                count: entry.edits.len() as u64,
            })
    }
}
