mod client;
mod config;
mod error;
mod fingerprint;
mod record;
mod store;

pub use client::{Order, Registry, RegistryClient};
pub use config::{RegistryConfig, SigningKey, DEFAULT_NOTE};
pub use error::{RegistryError, RegistryResult};
pub use fingerprint::{Fingerprint, FingerprintParseError};
pub use record::{
    short_address, AuditTrail, EditRecord, Principal, Record, RecordId, RecordSummary,
    Verification,
};
pub use store::{InMemoryRecordStore, RecordStore, StoreError, WriteReceipt};

// Re-export the ledger primitives that appear in the public API
pub use alloy_primitives::{Address, B256};
