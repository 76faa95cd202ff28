//! Test store whose reads can be switched off.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{KeyValueStore, MemoryStore};
use crate::error::{StoreError, StoreResult};

/// [`MemoryStore`] that fails every `get` while `fail_reads` is set.
/// Writes always go through.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reads: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        FlakyStore {
            inner,
            fail_reads: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::QueryFailed("database is locked".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }
}
