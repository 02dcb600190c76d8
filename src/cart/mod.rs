//! Cart store and the durable storage it persists through.

pub mod error;
pub mod storage;
pub mod store;

pub use error::*;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{load_from_storage, CartStore};
