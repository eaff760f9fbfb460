//! Storage adapters implementing the `RecordStore` port.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
