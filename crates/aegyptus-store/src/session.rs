//! # Cart Session
//!
//! One shopper's live cart: the aggregate plus the persistence it flushes
//! to after every applied change.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  session.add_item(&snapshot).await                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart.add_item(&snapshot) ──► MutationOutcome                          │
//! │       │                                                                 │
//! │       ├── Applied   ──► persistence.save(&cart).await ──► return       │
//! │       └── Rejected* ──► return (nothing written)                       │
//! │                                                                         │
//! │  `&mut self` serializes mutations: each one has flushed before the     │
//! │  next can start, so every call observes all earlier ones.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If the stored cart could not be read when the session opened, every
//! mutation first retries the read. Until one succeeds nothing is written.
//! Once it does, the stored cart is adopted if the session has not changed
//! its cart in the meantime; otherwise the in-memory cart is kept and
//! overwrites it.

use aegyptus_core::{
    Cart, CartScope, CartTotals, CatalogSnapshot, CheckoutPolicy, MutationOutcome,
    OrderConfirmation, OrderDraft, OrderSummary, ProductId, ShippingMethod, UnitsAdded,
};
use tracing::{debug, info, warn};

use crate::checkout::OrderSubmitter;
use crate::error::StoreResult;
use crate::persistence::{CartPersistence, SaveStatus};
use crate::storage::KeyValueStore;

/// A cart bound to a storage key.
#[derive(Debug)]
pub struct CartSession<S> {
    cart: Cart,
    persistence: CartPersistence<S>,
    /// Changes applied while the stored cart was unreadable.
    unsynced: bool,
}

impl<S: KeyValueStore> CartSession<S> {
    /// Opens the cart stored under `key`, or an empty one.
    pub async fn open(store: S, key: impl Into<String>) -> Self {
        let persistence = CartPersistence::new(store, key);
        let cart = persistence.load().await;
        info!(key = %persistence.key(), lines = cart.len(), "Cart session opened");
        CartSession {
            cart,
            persistence,
            unsynced: false,
        }
    }

    /// Opens the cart of `scope` under `prefix`.
    pub async fn open_scope(store: S, prefix: &str, scope: &CartScope) -> Self {
        Self::open(store, scope.storage_key(prefix)).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn add_item(&mut self, snapshot: &CatalogSnapshot) -> MutationOutcome {
        self.reconcile().await;
        let outcome = self.cart.add_item(snapshot);
        debug!(product_id = %snapshot.product_id, ?outcome, "add_item");
        self.flush_if_applied(outcome).await;
        outcome
    }

    /// Adds several units, flushing once at the end.
    pub async fn add_units(&mut self, snapshot: &CatalogSnapshot, units: u32) -> UnitsAdded {
        self.reconcile().await;
        let result = self.cart.add_units(snapshot, units);
        debug!(
            product_id = %snapshot.product_id,
            requested = result.requested,
            added = result.added,
            "add_units"
        );
        if result.added > 0 {
            self.flush().await;
        }
        result
    }

    pub async fn remove_item(&mut self, product_id: ProductId) -> MutationOutcome {
        self.reconcile().await;
        let outcome = self.cart.remove_item(product_id);
        debug!(%product_id, ?outcome, "remove_item");
        self.flush_if_applied(outcome).await;
        outcome
    }

    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> MutationOutcome {
        self.reconcile().await;
        let outcome = self.cart.update_quantity(product_id, quantity);
        debug!(%product_id, quantity, ?outcome, "update_quantity");
        self.flush_if_applied(outcome).await;
        outcome
    }

    pub async fn clear(&mut self) -> MutationOutcome {
        self.reconcile().await;
        let outcome = self.cart.clear();
        debug!("clear");
        self.flush_if_applied(outcome).await;
        outcome
    }

    // =========================================================================
    // Account Switching
    // =========================================================================

    /// Switches to the cart stored under `key`.
    ///
    /// The current cart is flushed under its own key first, then replaced
    /// by whatever is stored under the new one.
    pub async fn rebind(&mut self, key: impl Into<String>) {
        let key = key.into();
        if key == self.persistence.key() {
            return;
        }

        self.flush().await;

        let next = CartPersistence::new(self.persistence.store().clone(), key);
        self.cart = next.load().await;
        info!(
            from = %self.persistence.key(),
            to = %next.key(),
            lines = self.cart.len(),
            "Cart session rebound"
        );
        self.persistence = next;
        self.unsynced = false;
    }

    pub async fn rebind_scope(&mut self, prefix: &str, scope: &CartScope) {
        self.rebind(scope.storage_key(prefix)).await;
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submits the cart as an order and clears it on success.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` (wrapped) when there is nothing to order
    /// - Whatever the submitter returns; the cart is left untouched
    pub async fn checkout<O: OrderSubmitter>(
        &mut self,
        submitter: &O,
        policy: &CheckoutPolicy,
        method: ShippingMethod,
    ) -> StoreResult<OrderConfirmation> {
        let draft = OrderDraft::from_view(&self.cart, policy, method)?;

        let confirmation = match submitter.submit(&draft).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                warn!(key = %self.persistence.key(), error = %e, "Order submission failed");
                return Err(e);
            }
        };

        info!(
            order_id = %confirmation.order_id,
            total = %draft.summary.total,
            "Order placed"
        );
        self.clear().await;
        Ok(confirmation)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn key(&self) -> &str {
        self.persistence.key()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn summary(&self, policy: &CheckoutPolicy, method: ShippingMethod) -> OrderSummary {
        OrderSummary::compute(&self.cart, policy, method)
    }

    /// Whether the last flush failed to reach storage.
    pub fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    /// Retries an earlier failed read of the stored cart.
    async fn reconcile(&mut self) {
        if !self.persistence.is_unverified() {
            return;
        }

        match self.persistence.load_checked().await {
            Ok(stored) if !self.unsynced => {
                info!(key = %self.persistence.key(), lines = stored.len(), "Adopted stored cart");
                self.cart = stored;
            }
            Ok(stored) => {
                warn!(
                    key = %self.persistence.key(),
                    stored_lines = stored.len(),
                    lines = self.cart.len(),
                    "Keeping in-memory cart over stored one"
                );
                self.unsynced = false;
            }
            Err(e) => {
                debug!(key = %self.persistence.key(), error = %e, "Stored cart still unreadable");
            }
        }
    }

    async fn flush_if_applied(&mut self, outcome: MutationOutcome) {
        if outcome.is_applied() {
            self.flush().await;
        }
    }

    async fn flush(&mut self) -> SaveStatus {
        if self.persistence.is_unverified() {
            self.unsynced = true;
        }
        self.persistence.save(&self.cart).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
