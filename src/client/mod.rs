mod cache;
mod client;
mod lock;
mod registry;

pub use client::{Order, RegistryClient};
pub use registry::Registry;
