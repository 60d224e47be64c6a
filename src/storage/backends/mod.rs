//! Data store backends

pub mod file;
pub mod memory;

pub use file::JsonDataStore;
pub use memory::MemoryDataStore;
