//! # Key/Value Storage
//!
//! The durable string store carts are persisted into.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         KeyValueStore                                   │
//! │                    get / set / remove (async)                           │
//! │                              │                                          │
//! │             ┌────────────────┴────────────────┐                         │
//! │             ▼                                 ▼                         │
//! │      ┌─────────────┐                  ┌──────────────┐                  │
//! │      │ MemoryStore │                  │ SqliteStore  │                  │
//! │      │ HashMap     │                  │ cart_storage │                  │
//! │      │ per process │                  │ table        │                  │
//! │      └─────────────┘                  └──────────────┘                  │
//! │   tests, ephemeral sessions        durable, survives restarts           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handles are cheap to clone and clones share the same underlying data.

use std::future::Future;

use crate::error::StoreResult;

pub mod memory;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod flaky;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A durable string-to-string store.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// Reads the value under `key`, `None` if absent.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Deletes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;
}
