use std::fmt;

use serde::{Deserialize, Serialize};

use super::edit::EditRecord;
use super::record::Record;
use crate::fingerprint::Fingerprint;

/// A record together with its complete, ordered edit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub record: Record,
    pub edits: Vec<EditRecord>,
}

/// Outcome of checking a piece of content against a record's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    /// Content matches the record's current fingerprint.
    Current,
    /// Content matches an earlier version. Version 0 is the content the
    /// record was created with; version `k` is the content after edit `k - 1`.
    Superseded { version: usize },
    /// Content matches no version the ledger knows about.
    Unrecognized,
}

impl AuditTrail {
    pub fn new(record: Record, edits: Vec<EditRecord>) -> Self {
        AuditTrail { record, edits }
    }

    /// Edit count agrees with the log and indices run 0..n without gaps.
    pub fn is_complete(&self) -> bool {
        self.edits.len() as u64 == self.record.edit_count
            && self
                .edits
                .iter()
                .enumerate()
                .all(|(i, edit)| edit.index == i as u64)
    }

    /// Every fingerprint the record has carried, oldest first, ending with
    /// the current one. Always `edits.len() + 1` entries long.
    pub fn fingerprint_history(&self) -> Vec<Fingerprint> {
        self.edits
            .iter()
            .map(|edit| edit.previous_fingerprint)
            .chain(std::iter::once(self.record.fingerprint))
            .collect()
    }

    /// Most recent version carrying `fingerprint`.
    pub fn version_of(&self, fingerprint: &Fingerprint) -> Option<usize> {
        self.fingerprint_history()
            .iter()
            .rposition(|candidate| candidate == fingerprint)
    }

    pub fn verify(&self, content: impl AsRef<[u8]>) -> Verification {
        let fingerprint = Fingerprint::of(content);
        if fingerprint == self.record.fingerprint {
            return Verification::Current;
        }
        match self.version_of(&fingerprint) {
            Some(version) => Verification::Superseded { version },
            None => Verification::Unrecognized,
        }
    }

    pub fn latest_edit(&self) -> Option<&EditRecord> {
        self.edits.last()
    }
}

impl fmt::Display for AuditTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)?;
        for edit in &self.edits {
            write!(f, "\n  {}", edit)?;
        }
        Ok(())
    }
}
