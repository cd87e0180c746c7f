#![allow(dead_code)]

pub mod faulty_store;

use news_registry::{
    Address, InMemoryRecordStore, RegistryClient, RegistryConfig, SigningKey,
};

pub use faulty_store::FaultyStore;

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub fn config() -> RegistryConfig {
    RegistryConfig {
        contract_address: CONTRACT.to_string(),
        private_key: Some(SigningKey::new(format!("0x{}", "ab".repeat(32)))),
        default_note: "Updated".to_string(),
        ..Default::default()
    }
}

pub fn alice() -> Address {
    Address::repeat_byte(0xa1)
}

pub fn bob() -> Address {
    Address::repeat_byte(0xb0)
}

pub fn client() -> RegistryClient<InMemoryRecordStore> {
    RegistryClient::new(InMemoryRecordStore::with_signer_address(alice()), config())
        .expect("valid test config")
}

pub fn faulty_client() -> RegistryClient<FaultyStore> {
    RegistryClient::new(
        FaultyStore::new(InMemoryRecordStore::with_signer_address(alice())),
        config(),
    )
    .expect("valid test config")
}
