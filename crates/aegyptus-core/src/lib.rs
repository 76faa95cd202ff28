//! # aegyptus-core: Pure Cart Logic for the AEGYPTUS Bazaar
//!
//! This crate owns the shopping cart of the Bazaar marketplace: the line
//! items a shopper has collected, the rules that keep them consistent with
//! the stock they were offered, and the totals the checkout page reads.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AEGYPTUS Bazaar Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Storefront (Next.js)                           │   │
//! │  │    Item page ──► Cart modal ──► Checkout ──► Confirmation      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ add / remove / update / clear         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               aegyptus-store (CartSession)                      │   │
//! │  │         mutation ──► flush to key/value storage                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aegyptus-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ checkout  │  │   │
//! │  │   │ ProductId │  │   Money   │  │   Cart    │  │ CartView  │  │   │
//! │  │   │ CartScope │  │  TaxRate  │  │ LineItem  │  │ OrderDraft│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identifiers, catalog snapshots, cart scopes
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart aggregate and its mutation outcomes
//! - [`checkout`] - Read-only consumption surface and order math
//! - [`validation`] - Input validation for catalog snapshots
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use aegyptus_core::{Cart, CatalogSnapshot, Money, MutationOutcome, ProductId};
//!
//! let mut cart = Cart::new();
//! let scarab = CatalogSnapshot::new(ProductId::new(1), "Scarab", Money::from_cents(2500), 3);
//!
//! assert_eq!(cart.add_item(&scarab), MutationOutcome::Applied);
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(cart.subtotal(), Money::from_cents(2500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, LineItem, MutationOutcome, UnitsAdded};
pub use checkout::{
    CartTotals, CartView, CheckoutPolicy, OrderConfirmation, OrderDraft, OrderLine, OrderSummary,
    ShippingMethod,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key prefix under which carts are persisted.
///
/// The storefront historically kept a single `"cart"` entry per browser;
/// scoped carts append the scope to this prefix.
pub const DEFAULT_CART_KEY_PREFIX: &str = "cart";

/// Image shown for line items whose catalog entry has no picture.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
