use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, keccak256, B256};
use serde::{Deserialize, Serialize};

/// Error returned when parsing a fingerprint from hex.
pub type FingerprintParseError = hex::FromHexError;

/// Keccak-256 digest of a record's content.
///
/// The ledger only ever sees fingerprints; the content itself lives at the
/// record's source locator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(B256);

impl Fingerprint {
    pub const LEN: usize = 32;

    /// Fingerprint arbitrary content. Empty input is valid.
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        Fingerprint(keccak256(content.as_ref()))
    }

    pub fn from_digest(digest: B256) -> Self {
        Fingerprint(digest)
    }

    pub fn digest(&self) -> B256 {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }

    /// True if `content` hashes to this fingerprint.
    pub fn matches(&self, content: impl AsRef<[u8]>) -> bool {
        Fingerprint::of(content) == *self
    }
}

impl From<B256> for Fingerprint {
    fn from(digest: B256) -> Self {
        Fingerprint(digest)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.0)
    }
}

/// Accepts 64 hex characters, with or without a `0x` prefix.
impl FromStr for Fingerprint {
    type Err = FingerprintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Fingerprint)
    }
}
