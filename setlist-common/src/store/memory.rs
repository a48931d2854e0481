//! In-memory key-value store
//!
//! Used by tests and by the server's `--memory` mode. Reads and writes can be
//! made to fail on demand to exercise the error paths.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::KvStore;
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    failing_writes: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` fail (or succeed again)
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` on `key` fail (or succeed again)
    pub async fn set_fail_writes(&self, key: &str, fail: bool) {
        let mut failing = self.failing_writes.write().await;
        if fail {
            failing.insert(key.to_string());
        } else {
            failing.remove(key);
        }
    }

    /// Raw stored text, bypassing failure injection
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    /// Store raw text, bypassing failure injection
    pub async fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.values.write().await.insert(key.to_string(), value.into());
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable(format!("read of '{}' failed", key)));
        }
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if self.failing_writes.read().await.contains(key) {
            return Err(Error::StoreUnavailable(format!("write of '{}' failed", key)));
        }
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
