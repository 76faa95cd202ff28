//! # Cart Aggregate
//!
//! The shopping cart of a Bazaar session: one line per distinct product,
//! each capped by the stock the catalog reported when it was added.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action        Cart Method             Outcome               │
//! │  ─────────────────        ───────────             ───────               │
//! │                                                                         │
//! │  "Add to cart" ─────────► add_item(snapshot) ───► Applied              │
//! │                                                   RejectedStockLimit    │
//! │                                                                         │
//! │  Quantity +/- ──────────► update_quantity() ────► Applied              │
//! │                                                   RejectedNotFound      │
//! │                                                   RejectedStockLimit    │
//! │                                                   RejectedInvalidQty    │
//! │                                                                         │
//! │  Trash icon ────────────► remove_item() ────────► Applied              │
//! │                                                   RejectedNotFound      │
//! │                                                                         │
//! │  Order placed ──────────► clear() ──────────────► Applied              │
//! │                                                                         │
//! │  A rejected mutation leaves the cart exactly as it was.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one [`LineItem`] per [`ProductId`]
//! - `1 <= quantity <= stock_limit` for every line
//! - `item_count` and `subtotal` are computed from the lines on every read

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CatalogSnapshot, ProductId};
use crate::validation::{validate_line_item, validate_snapshot};
use crate::PLACEHOLDER_IMAGE;

// =============================================================================
// Line Item
// =============================================================================

/// One product and its quantity within the cart.
///
/// `name`, `unit_price` and `image_ref` are frozen from the snapshot that
/// first added the product. `stock_limit` is refreshed by later adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    #[serde(default)]
    pub image_ref: Option<String>,
    pub quantity: u32,
    pub stock_limit: u32,
}

impl LineItem {
    /// Creates a single-unit line from a catalog snapshot.
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        LineItem {
            product_id: snapshot.product_id,
            name: snapshot.name.clone(),
            unit_price: snapshot.unit_price,
            image_ref: snapshot.image_ref.clone(),
            quantity: 1,
            stock_limit: snapshot.stock_limit,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Whether another unit would exceed the known stock.
    #[inline]
    pub fn at_stock_limit(&self) -> bool {
        self.quantity >= self.stock_limit
    }

    /// The image to display, falling back to the storefront placeholder.
    pub fn image_or_placeholder(&self) -> &str {
        self.image_ref.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}

// =============================================================================
// Mutation Outcome
// =============================================================================

/// What happened to a requested cart mutation.
///
/// Rejections are not errors: the cart is a client-side cache with no
/// authority over real stock, so it simply declines and reports why. The
/// storefront turns these into "Max stock reached" style messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MutationOutcome {
    /// The cart changed.
    Applied,
    /// Would exceed (or the product has no) known stock.
    RejectedStockLimit,
    /// No line for that product.
    RejectedNotFound,
    /// Requested quantity below one.
    RejectedInvalidQuantity,
    /// The catalog snapshot carries a negative price.
    RejectedInvalidCandidate,
}

impl MutationOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Result of adding several units of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UnitsAdded {
    pub requested: u32,
    pub added: u32,
    /// Outcome of the last attempted unit.
    pub outcome: MutationOutcome,
}

impl UnitsAdded {
    /// Whether every requested unit made it into the cart.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.requested > 0 && self.added == self.requested
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart aggregate.
///
/// Backed by a `Vec` so lines keep the order they were first added in;
/// lookups are by product id. Serializes as a bare JSON array of
/// [`LineItem`]s, and deserializing re-checks every invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from stored lines, rejecting any that break the
    /// invariants.
    pub fn from_items(items: Vec<LineItem>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.product_id) {
                return Err(CoreError::DuplicateProduct(item.product_id));
            }
            validate_line_item(item)?;
        }
        Ok(Cart { items })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - New product with stock: added with quantity 1
    /// - New product without stock: `RejectedStockLimit`
    /// - Known product below the snapshot's stock: quantity + 1, stock limit
    ///   refreshed from the snapshot
    /// - Known product at or above the snapshot's stock: `RejectedStockLimit`,
    ///   line left untouched
    pub fn add_item(&mut self, snapshot: &CatalogSnapshot) -> MutationOutcome {
        if validate_snapshot(snapshot).is_err() {
            return MutationOutcome::RejectedInvalidCandidate;
        }

        if let Some(item) = self.find_mut(snapshot.product_id) {
            if item.quantity >= snapshot.stock_limit {
                return MutationOutcome::RejectedStockLimit;
            }
            item.quantity += 1;
            item.stock_limit = snapshot.stock_limit;
            return MutationOutcome::Applied;
        }

        if !snapshot.in_stock() {
            return MutationOutcome::RejectedStockLimit;
        }

        self.items.push(LineItem::from_snapshot(snapshot));
        MutationOutcome::Applied
    }

    /// Adds `units` units one at a time, stopping at the first rejection.
    pub fn add_units(&mut self, snapshot: &CatalogSnapshot, units: u32) -> UnitsAdded {
        let mut added = 0;
        let mut outcome = MutationOutcome::RejectedInvalidQuantity;

        for _ in 0..units {
            outcome = self.add_item(snapshot);
            if !outcome.is_applied() {
                break;
            }
            added += 1;
        }

        UnitsAdded {
            requested: units,
            added,
            outcome,
        }
    }

    /// Removes a product's line.
    pub fn remove_item(&mut self, product_id: ProductId) -> MutationOutcome {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == before {
            MutationOutcome::RejectedNotFound
        } else {
            MutationOutcome::Applied
        }
    }

    /// Sets a line's quantity.
    ///
    /// Zero is rejected rather than treated as removal; the storefront
    /// offers a separate remove button.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> MutationOutcome {
        if quantity < 1 {
            return MutationOutcome::RejectedInvalidQuantity;
        }

        let Some(item) = self.find_mut(product_id) else {
            return MutationOutcome::RejectedNotFound;
        };

        if quantity > item.stock_limit {
            return MutationOutcome::RejectedStockLimit;
        }

        item.quantity = quantity;
        MutationOutcome::Applied
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> MutationOutcome {
        self.items.clear();
        MutationOutcome::Applied
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in the order they were first added.
    #[inline]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (the badge on the cart icon).
    ///
    /// Widened to `u64` so several lines near `u32::MAX` still add up.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of all line totals, before shipping and tax. Saturates at the
    /// largest representable amount.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CoreError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
