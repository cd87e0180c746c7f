use thiserror::Error;

use crate::record::RecordId;

/// Failures reported by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The ledger refused or reverted the transaction.
    #[error("transaction rejected: {reason}")]
    Rejected { reason: String },

    /// The transaction was submitted but its outcome could not be confirmed.
    #[error("transaction not confirmed: {reason}")]
    Unconfirmed { reason: String },

    #[error("record {0} does not exist")]
    UnknownRecord(RecordId),

    #[error("edit index {index} out of range for record {id} ({count} edits)")]
    EditOutOfRange {
        id: RecordId,
        index: u64,
        count: u64,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl StoreError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        StoreError::Rejected {
            reason: reason.into(),
        }
    }

    pub fn unconfirmed(reason: impl Into<String>) -> Self {
        StoreError::Unconfirmed {
            reason: reason.into(),
        }
    }
}
