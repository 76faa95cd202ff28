//! # Domain Types
//!
//! Identifiers and value types shared by the cart and its collaborators.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │   ProductId     │   │ CatalogSnapshot  │   │   CartScope     │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  u64 item id    │   │  product_id      │   │  Global         │      │
//! │  │  from catalog   │   │  name, price     │   │  Guest(uuid)    │      │
//! │  └─────────────────┘   │  image_ref       │   │  Account(id)    │      │
//! │                        │  stock_limit     │   └─────────────────┘      │
//! │  ┌─────────────────┐   └──────────────────┘                            │
//! │  │    TaxRate      │                                                    │
//! │  │  bps (u32)      │                                                    │
//! │  │  700 = 7%       │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 700 bps = 7%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for config input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product Identifier
// =============================================================================

/// Catalog item identifier.
///
/// Opaque to the cart: it is only compared for equality. The catalog hands
/// out integer item ids, so this serializes as a plain JSON number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(#[ts(type = "number")] u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// What the catalog knows about an item at the moment "add to cart" is
/// clicked.
///
/// The cart never calls the catalog itself; the caller hands over a fresh
/// snapshot with every add. `stock_limit` is a hint for client-side
/// enforcement only, the catalog stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    #[serde(default)]
    pub image_ref: Option<String>,
    pub stock_limit: u32,
}

impl CatalogSnapshot {
    /// Creates a snapshot without an image.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        stock_limit: u32,
    ) -> Self {
        CatalogSnapshot {
            product_id,
            name: name.into(),
            unit_price,
            image_ref: None,
            stock_limit,
        }
    }

    /// Attaches an image reference.
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Whether the catalog reported any stock at all.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock_limit > 0
    }
}

// =============================================================================
// Cart Scope
// =============================================================================

/// The identity a cart is stored under.
///
/// ## Key Layout
/// ```text
/// Global            → "cart"
/// Guest(uuid)       → "cart:guest:550e8400-e29b-41d4-a716-446655440000"
/// Account("42")     → "cart:account:42"
/// ```
///
/// `Global` reproduces the one-cart-per-browser layout, where switching
/// accounts in the same browser shares a cart. Guest and account scopes
/// keep those carts apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CartScope {
    Global,
    Guest(Uuid),
    Account(String),
}

impl CartScope {
    /// Starts a fresh guest scope with a random session id.
    pub fn new_guest() -> Self {
        CartScope::Guest(Uuid::new_v4())
    }

    /// Builds the storage key for this scope under `prefix`.
    pub fn storage_key(&self, prefix: &str) -> String {
        match self {
            CartScope::Global => prefix.to_string(),
            CartScope::Guest(id) => format!("{}:guest:{}", prefix, id),
            CartScope::Account(id) => format!("{}:account:{}", prefix, id),
        }
    }
}

impl fmt::Display for CartScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartScope::Global => write!(f, "global"),
            CartScope::Guest(id) => write!(f, "guest:{}", id),
            CartScope::Account(id) => write!(f, "account:{}", id),
        }
    }
}

/// Parses `global`, `guest:<uuid>` or `account:<id>`.
impl FromStr for CartScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("global") {
            return Ok(CartScope::Global);
        }

        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "scope".to_string(),
            reason: reason.to_string(),
        };

        match s.split_once(':') {
            Some(("guest", id)) => Uuid::parse_str(id)
                .map(CartScope::Guest)
                .map_err(|_| invalid("guest scope needs a UUID session id")),
            Some(("account", id)) if !id.trim().is_empty() => {
                Ok(CartScope::Account(id.trim().to_string()))
            }
            Some(("account", _)) => Err(ValidationError::Required {
                field: "account id".to_string(),
            }),
            _ => Err(invalid("expected global, guest:<uuid> or account:<id>")),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
