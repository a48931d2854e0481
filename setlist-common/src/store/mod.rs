//! Key-value persistence
//!
//! The service persists two whole JSON documents under fixed keys. The store
//! gives atomic get/set per key and nothing more: no transactions across
//! keys, last write wins.

use async_trait::async_trait;

use crate::Result;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key of the song store document (JSON object, title → lyrics)
pub const SONGS_KEY: &str = "songs";

/// Key of the order store document (JSON array of `{title, hidden}`)
pub const ORDER_KEY: &str = "songOrder";

/// Whole-document key-value store
///
/// Values are JSON text. Keeping them as text (rather than a parsed value)
/// preserves the key order of the song store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the document stored under `key`, `None` if never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
