//! # Validation Module
//!
//! Input validation for data entering the cart from outside: catalog
//! snapshots handed over by the storefront and line items read back from
//! storage.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Storefront                                                    │
//! │  └── "Max stock reached" / "Not enough stock" toasts                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── validate_snapshot   (price of an add candidate)                    │
//! │  └── validate_line_item  (quantity window of a stored item)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart aggregate                                                │
//! │  └── stock ceiling & uniqueness on every mutation                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::LineItem;
use crate::error::{CoreError, ValidationError};
use crate::types::{CatalogSnapshot, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates an add-to-cart candidate.
///
/// Only the price is checked. Names are display text and any string is
/// accepted, including an empty one. A zero stock limit is NOT a validation
/// failure either: the cart answers that with a stock-limit rejection.
pub fn validate_snapshot(snapshot: &CatalogSnapshot) -> ValidationResult<()> {
    validate_price_cents(snapshot.unit_price.cents())?;
    Ok(())
}

/// Validates a line item read back from storage.
pub fn validate_line_item(item: &LineItem) -> Result<(), CoreError> {
    if item.quantity < 1 || item.quantity > item.stock_limit {
        return Err(CoreError::QuantityOutOfRange {
            product_id: item.product_id,
            quantity: item.quantity,
            stock_limit: item.stock_limit,
        });
    }

    validate_price_cents(item.unit_price.cents())?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
