//! # Cart Persistence
//!
//! Moves a [`Cart`] in and out of a [`KeyValueStore`] under one storage key.
//!
//! ## Load / Save Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         load()                                          │
//! │                                                                         │
//! │  store.get(key)                                                        │
//! │     ├── Err(_)          ──► warn, mark unverified, empty cart           │
//! │     ├── Ok(None)        ──► empty cart                                  │
//! │     └── Ok(Some(json))                                                  │
//! │            ├── parses & valid  ──► cart                                 │
//! │            └── malformed       ──► warn, remove(key), empty cart        │
//! │                                                                         │
//! │                         save(cart)                                      │
//! │                                                                         │
//! │  unverified ──► withheld, Degraded (stored value left alone)           │
//! │  serialize full item array ──► store.set(key, json)                    │
//! │     ├── Ok   ──► Persisted (leaves degraded mode)                       │
//! │     └── Err  ──► warn, Degraded (in-memory cart is unaffected)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A key is *unverified* from a failed read until the next successful one.
//! While unverified, `save` never writes: the stored value may be a valid
//! cart the shopper has not seen yet.
//!
//! Neither direction ever surfaces an error to the cart's callers; use
//! [`CartPersistence::load_checked`] and [`CartPersistence::try_save`]
//! where the failure matters, and [`CartPersistence::peek`] to look at a
//! stored value without repairing it.

use std::sync::atomic::{AtomicBool, Ordering};

use aegyptus_core::{Cart, CartScope};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::storage::KeyValueStore;

/// Result of a guarded save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The value reached the store.
    Persisted,
    /// The write failed or was withheld; the cart lives in memory only
    /// until the next successful save.
    Degraded,
}

/// Load/save adapter bound to one storage key.
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
    degraded: AtomicBool,
    unverified: AtomicBool,
}

impl<S: KeyValueStore> CartPersistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        CartPersistence {
            store,
            key: key.into(),
            degraded: AtomicBool::new(false),
            unverified: AtomicBool::new(false),
        }
    }

    /// Binds to the key of `scope` under `prefix`.
    pub fn for_scope(store: S, prefix: &str, scope: &CartScope) -> Self {
        Self::new(store, scope.storage_key(prefix))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the most recent save failed or was withheld.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Whether the last read of this key failed.
    pub fn is_unverified(&self) -> bool {
        self.unverified.load(Ordering::Relaxed)
    }

    /// Reads the stored cart, falling back to an empty one.
    pub async fn load(&self) -> Cart {
        match self.load_checked().await {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        }
    }

    /// Reads the stored cart, reporting read failures.
    ///
    /// A malformed value is still removed and read as an empty cart; only
    /// a failing store is an error.
    pub async fn load_checked(&self) -> StoreResult<Cart> {
        let raw = match self.store.get(&self.key).await {
            Ok(raw) => {
                if self.unverified.swap(false, Ordering::Relaxed) {
                    info!(key = %self.key, "Stored cart readable again");
                }
                raw
            }
            Err(e) => {
                self.unverified.store(true, Ordering::Relaxed);
                return Err(e);
            }
        };

        let Some(raw) = raw else {
            debug!(key = %self.key, "No stored cart");
            return Ok(Cart::new());
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                debug!(key = %self.key, lines = cart.len(), "Loaded cart");
                Ok(cart)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed stored cart");
                if let Err(e) = self.store.remove(&self.key).await {
                    warn!(key = %self.key, error = %e, "Failed to remove malformed cart");
                }
                Ok(Cart::new())
            }
        }
    }

    /// Parses the stored value without touching it.
    ///
    /// ## Returns
    /// - `Ok(None)` if nothing is stored
    /// - `Err(StoreError::Serialization)` if the value is malformed; it
    ///   stays in the store
    pub async fn peek(&self) -> StoreResult<Option<Cart>> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(Some(serde_json::from_str::<Cart>(&raw)?)),
            None => Ok(None),
        }
    }

    /// Writes the full item array, recovering from store failures.
    pub async fn save(&self, cart: &Cart) -> SaveStatus {
        if self.is_unverified() {
            self.degraded.store(true, Ordering::Relaxed);
            warn!(key = %self.key, "Stored cart unread, not overwriting it");
            return SaveStatus::Degraded;
        }

        match self.try_save(cart).await {
            Ok(()) => {
                if self.degraded.swap(false, Ordering::Relaxed) {
                    info!(key = %self.key, "Cart storage recovered");
                }
                SaveStatus::Persisted
            }
            Err(e) => {
                self.degraded.store(true, Ordering::Relaxed);
                warn!(key = %self.key, error = %e, "Cart not persisted, continuing in memory");
                SaveStatus::Degraded
            }
        }
    }

    /// Writes the full item array and reports any failure.
    ///
    /// Writes even while the key is unverified.
    pub async fn try_save(&self, cart: &Cart) -> StoreResult<()> {
        let json = serde_json::to_string(cart)?;
        self.store.set(&self.key, &json).await
    }

    /// Stores an empty cart (`[]`). The key is kept.
    pub async fn clear(&self) -> SaveStatus {
        self.save(&Cart::new()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use crate::storage::flaky::FlakyStore;
    use crate::storage::MemoryStore;
    use aegyptus_core::{CatalogSnapshot, Money, ProductId};

    fn scarab() -> CatalogSnapshot {
        CatalogSnapshot::new(ProductId::new(1), "Scarab", Money::from_cents(2500), 3)
            .with_image("/img/scarab.png")
    }

    #[tokio::test]
    async fn test_missing_key_loads_empty() {
        let persistence = CartPersistence::new(MemoryStore::new(), "cart");
        assert!(persistence.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        let persistence = CartPersistence::new(store.clone(), "cart");

        let mut cart = Cart::new();
        cart.add_units(&scarab(), 2);
        cart.add_item(&CatalogSnapshot::new(
            ProductId::new(2),
            "Ankh",
            Money::from_cents(900),
            5,
        ));

        assert_eq!(persistence.save(&cart).await, SaveStatus::Persisted);

        let reopened = CartPersistence::new(store, "cart");
        assert_eq!(reopened.load().await, cart);
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let store = MemoryStore::new();
        let persistence = CartPersistence::new(store.clone(), "cart");

        let mut cart = Cart::new();
        cart.add_item(&scarab());
        persistence.save(&cart).await;

        let raw = store.get("cart").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "productId": 1,
                "name": "Scarab",
                "unitPrice": 2500,
                "imageRef": "/img/scarab.png",
                "quantity": 1,
                "stockLimit": 3
            }])
        );
    }

    #[tokio::test]
    async fn test_malformed_value_is_removed() {
        let store = MemoryStore::new();
        store.set("cart", "{not json").await.unwrap();

        let persistence = CartPersistence::new(store.clone(), "cart");
        assert!(persistence.load().await.is_empty());
        assert!(store.get("cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_peek_leaves_malformed_value_in_place() {
        let store = MemoryStore::new();
        store.set("cart", "{not json").await.unwrap();

        let persistence = CartPersistence::new(store.clone(), "cart");
        assert!(matches!(
            persistence.peek().await,
            Err(StoreError::Serialization(_))
        ));
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_peek_reads_stored_cart() {
        let store = MemoryStore::new();
        let persistence = CartPersistence::new(store.clone(), "cart");
        assert_eq!(persistence.peek().await.unwrap(), None);

        let mut cart = Cart::new();
        cart.add_item(&scarab());
        persistence.save(&cart).await;

        assert_eq!(persistence.peek().await.unwrap(), Some(cart));
    }

    #[tokio::test]
    async fn test_failed_read_withholds_writes() {
        let store = FlakyStore::new(MemoryStore::new());
        let persistence = CartPersistence::new(store.clone(), "cart");

        let mut stored = Cart::new();
        stored.add_units(&scarab(), 2);
        persistence.save(&stored).await;

        store.set_fail_reads(true);
        assert!(persistence.load().await.is_empty());
        assert!(persistence.is_unverified());

        let mut other = Cart::new();
        other.add_item(&CatalogSnapshot::new(ProductId::new(9), "Sphinx", Money::from_cents(1), 1));
        assert_eq!(persistence.save(&other).await, SaveStatus::Degraded);
        assert!(persistence.is_degraded());

        store.set_fail_reads(false);
        assert_eq!(persistence.load_checked().await.unwrap(), stored);
        assert!(!persistence.is_unverified());
        assert_eq!(persistence.save(&other).await, SaveStatus::Persisted);
        assert!(!persistence.is_degraded());
    }

    #[tokio::test]
    async fn test_load_checked_reports_read_errors() {
        let store = FlakyStore::new(MemoryStore::new());
        store.set_fail_reads(true);

        let persistence = CartPersistence::new(store, "cart");
        assert!(matches!(
            persistence.load_checked().await,
            Err(StoreError::QueryFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_invariant_violation_is_treated_as_corrupt() {
        let store = MemoryStore::new();
        store
            .set(
                "cart",
                r#"[{"productId":1,"name":"A","unitPrice":100,"quantity":9,"stockLimit":2}]"#,
            )
            .await
            .unwrap();

        let persistence = CartPersistence::new(store.clone(), "cart");
        assert!(persistence.load().await.is_empty());
        assert!(store.get("cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_writes_empty_array() {
        let store = MemoryStore::new();
        let persistence = CartPersistence::new(store.clone(), "cart");

        let mut cart = Cart::new();
        cart.add_item(&scarab());
        persistence.save(&cart).await;
        persistence.clear().await;

        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_failed_write_degrades() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let persistence = CartPersistence::new(db.cart_store(), "cart");
        db.close().await;

        let mut cart = Cart::new();
        cart.add_item(&scarab());

        assert_eq!(persistence.save(&cart).await, SaveStatus::Degraded);
        assert!(persistence.is_degraded());
        assert!(persistence.try_save(&cart).await.is_err());
        // Unreadable storage behaves like an empty one
        assert!(persistence.load().await.is_empty());
        assert!(persistence.is_unverified());
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_scoped_keys_are_isolated() {
        let store = MemoryStore::new();
        let alice = CartPersistence::for_scope(
            store.clone(),
            "cart",
            &CartScope::Account("alice".into()),
        );
        let bob =
            CartPersistence::for_scope(store.clone(), "cart", &CartScope::Account("bob".into()));

        let mut cart = Cart::new();
        cart.add_item(&scarab());
        alice.save(&cart).await;

        assert_eq!(alice.key(), "cart:account:alice");
        assert_eq!(alice.load().await.item_count(), 1);
        assert!(bob.load().await.is_empty());
    }
}
