use alloy_primitives::B256;
use thiserror::Error;

use crate::record::RecordId;
use crate::store::StoreError;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A local precondition failed; the store was never contacted.
    #[error("invalid {field}: {reason}")]
    ValidationFailed { field: &'static str, reason: String },

    /// A create or amend was rejected or could not be confirmed.
    #[error("{operation} failed{}: {source}", fmt_id(.id))]
    WriteFailed {
        operation: &'static str,
        id: Option<RecordId>,
        source: StoreError,
    },

    #[error("{operation} failed{}: {source}", fmt_id(.id))]
    ReadFailed {
        operation: &'static str,
        id: Option<RecordId>,
        source: StoreError,
    },

    /// The create was committed but the assigned id could not be read back.
    /// The record exists; submitting the content again would duplicate it.
    #[error("record created in transaction {tx} but its id could not be read: {source}")]
    CreatedIdUnknown { tx: B256, source: StoreError },

    #[error("record {id} not found")]
    NotFound { id: RecordId },

    #[error("configuration error: {0}")]
    Config(String),
}

fn fmt_id(id: &Option<RecordId>) -> String {
    match id {
        Some(id) => format!(" for record {}", id),
        None => String::new(),
    }
}

impl RegistryError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        RegistryError::ValidationFailed {
            field,
            reason: reason.into(),
        }
    }

    /// Classify a store failure on the write path.
    pub(crate) fn write(operation: &'static str, id: Option<RecordId>, source: StoreError) -> Self {
        match source {
            StoreError::UnknownRecord(id) => RegistryError::NotFound { id },
            source => RegistryError::WriteFailed {
                operation,
                id,
                source,
            },
        }
    }

    /// Classify a store failure on the read path.
    pub(crate) fn read(operation: &'static str, id: Option<RecordId>, source: StoreError) -> Self {
        match source {
            StoreError::UnknownRecord(id) => RegistryError::NotFound { id },
            source => RegistryError::ReadFailed {
                operation,
                id,
                source,
            },
        }
    }

    /// Reads may be retried freely. Writes never are, since the caller
    /// cannot tell whether an unconfirmed write landed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RegistryError::ReadFailed { .. })
    }
}
