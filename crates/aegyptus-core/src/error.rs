//! # Error Types
//!
//! Domain-specific error types for aegyptus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aegyptus-core errors (this file)                                      │
//! │  ├── CoreError        - Cart shape and checkout errors                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  aegyptus-store errors (separate crate)                                │
//! │  └── StoreError       - Storage, config and order submission failures  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Not Errors
//! A mutation the cart refuses (stock ceiling, unknown product, quantity
//! below one) is reported as a [`crate::MutationOutcome`], never as an
//! error. The cart state is unchanged either way.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A persisted cart lists the same product twice.
    ///
    /// ## When This Occurs
    /// - Stored cart value was edited by hand or written by an older client
    #[error("Product {0} appears more than once in the cart")]
    DuplicateProduct(ProductId),

    /// A persisted line item breaks `1 <= quantity <= stock_limit`.
    #[error("Product {product_id}: quantity {quantity} outside 1..={stock_limit}")]
    QuantityOutOfRange {
        product_id: ProductId,
        quantity: u32,
        stock_limit: u32,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a malformed cart scope).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityOutOfRange {
            product_id: ProductId::new(3),
            quantity: 5,
            stock_limit: 2,
        };
        assert_eq!(err.to_string(), "Product 3: quantity 5 outside 1..=2");
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(validation_err.to_string(), "name is required");

        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
