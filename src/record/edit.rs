use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::Principal;
use crate::fingerprint::Fingerprint;

/// One entry of a record's audit trail. Immutable once written.
///
/// `previous_fingerprint` is the record's fingerprint as it stood *before*
/// this edit; the new fingerprint is the next entry's previous value, or the
/// record's current fingerprint for the last entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    /// 0-based position in the audit trail.
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub previous_fingerprint: Fingerprint,
    pub editor: Principal,
    pub note: String,
}

impl fmt::Display for EditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edit #{} at {} by {} (previous {}): {}",
            self.index + 1,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.editor,
            self.previous_fingerprint,
            self.note
        )
    }
}
