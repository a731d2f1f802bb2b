//! Storage module
//!
//! The local key-value store the note collection is persisted to, with
//! in-memory and file-backed implementations. The SQLite implementation
//! lives in [`crate::database`].

pub mod file_store;
pub mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// String key-value store
///
/// A missing key is a valid state, reported as `Ok(None)`.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
