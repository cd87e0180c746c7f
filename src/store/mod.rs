mod error;
mod in_memory;
mod store;

pub use error::StoreError;
pub use in_memory::InMemoryRecordStore;
pub use store::{RecordStore, WriteReceipt};
