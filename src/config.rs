//! Registry client configuration.
//!
//! Loaded once at process start and handed to [`crate::RegistryClient::new`];
//! never mutated afterwards.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::Deserialize;

use crate::error::{RegistryError, RegistryResult};

pub const DEFAULT_NOTE: &str = "Updated content";

/// Hex-encoded private key used by the store to sign transactions.
///
/// Redacted in `Debug` and `Display`; never serialized.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(key: impl Into<String>) -> Self {
        SigningKey(key.into())
    }

    /// Raw key material, for the store implementation that signs.
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn validate(&self) -> Result<(), String> {
        let key = &self.0;
        if !key.starts_with("0x") {
            return Err("private_key must start with 0x".to_string());
        }
        if key.len() != 66 {
            return Err(format!(
                "private_key must be 66 characters (0x + 64 hex), got {}",
                key.len()
            ));
        }
        if !key[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("private_key must contain only hex characters after 0x".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

impl fmt::Display for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON-RPC endpoint of the ledger node.
    pub rpc_url: String,

    pub chain_id: u64,

    /// Deployed registry contract, `0x` + 40 hex characters.
    pub contract_address: String,

    /// Required for create/amend; reads work without it.
    pub private_key: Option<SigningKey>,

    /// Note recorded when an amend is submitted without one.
    pub default_note: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            contract_address: String::new(),
            private_key: None,
            default_note: DEFAULT_NOTE.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(toml: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate().map_err(RegistryError::Config)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.rpc_url.is_empty() {
            return Err("rpc_url cannot be empty".to_string());
        }
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err("rpc_url must start with http:// or https://".to_string());
        }

        if self.contract_address.is_empty() {
            return Err("contract_address cannot be empty".to_string());
        }
        if !self.contract_address.starts_with("0x") {
            return Err("contract_address must start with 0x".to_string());
        }
        if self.contract_address.len() != 42 {
            return Err(format!(
                "contract_address must be 42 characters (0x + 40 hex), got {}",
                self.contract_address.len()
            ));
        }
        if !self.contract_address[2..]
            .chars()
            .all(|c| c.is_ascii_hexdigit())
        {
            return Err("contract_address must contain only hex characters after 0x".to_string());
        }

        if let Some(key) = &self.private_key {
            key.validate()?;
        }

        if self.default_note.trim().is_empty() {
            return Err("default_note cannot be blank".to_string());
        }

        Ok(())
    }

    pub fn contract_address(&self) -> RegistryResult<Address> {
        Address::from_str(&self.contract_address)
            .map_err(|e| RegistryError::Config(format!("contract_address: {}", e)))
    }

    /// Writes need a signing key.
    pub fn can_write(&self) -> bool {
        self.private_key.is_some()
    }
}
