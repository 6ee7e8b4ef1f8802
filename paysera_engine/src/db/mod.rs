//! Order storage backends.
mod memory;

pub use memory::{MemoryOrder, MemoryOrderStore, MemoryStoreError};
