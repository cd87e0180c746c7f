use std::fmt;

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// Ledger-assigned record id. Ids are dense and start at 1.
pub type RecordId = u64;

/// Account that signed a create or amend transaction.
pub type Principal = Address;

/// A news item as held by the record store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fingerprint: Fingerprint,
    pub source_locator: String,
    pub creator: Principal,
    pub created_at: DateTime<Utc>,
    pub edit_count: u64,
}

impl Record {
    pub fn is_edited(&self) -> bool {
        self.edit_count > 0
    }

    /// Index of the most recent edit, if any.
    pub fn last_edit_index(&self) -> Option<u64> {
        self.edit_count.checked_sub(1)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "news #{}", self.id)?;
        writeln!(f, "  hash:    {}", self.fingerprint)?;
        writeln!(f, "  source:  {}", self.source_locator)?;
        writeln!(f, "  creator: {}", self.creator)?;
        writeln!(f, "  created: {}", self.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        write!(f, "  edits:   {}", self.edit_count)
    }
}

/// Row produced by reconstruction; what a presentation layer lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub fingerprint: Fingerprint,
    pub source_locator: String,
    pub creator: Principal,
    pub created_at: DateTime<Utc>,
    pub edit_count: u64,
}

impl From<Record> for RecordSummary {
    fn from(record: Record) -> Self {
        RecordSummary {
            id: record.id,
            fingerprint: record.fingerprint,
            source_locator: record.source_locator,
            creator: record.creator,
            created_at: record.created_at,
            edit_count: record.edit_count,
        }
    }
}

impl fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} edits={} by {} at {}",
            self.id,
            self.fingerprint,
            self.source_locator,
            self.edit_count,
            short_address(&self.creator.to_string()),
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Abbreviate an account for display: `0x1234...abcd`.
///
/// Strings of ten characters or fewer are returned unchanged, an empty
/// string becomes `N/A`.
pub fn short_address(address: &str) -> String {
    if address.is_empty() {
        return "N/A".to_string();
    }
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
