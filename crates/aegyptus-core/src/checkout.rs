//! # Checkout Surface
//!
//! The read-only view of the cart that the checkout flow consumes, and the
//! order math built on top of it.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Flow                                   │
//! │                                                                         │
//! │   Cart ──(CartView)──► OrderSummary::compute ──► subtotal               │
//! │                                 │                 + shipping            │
//! │                                 │                 + tax (on subtotal)   │
//! │                                 │                 = total               │
//! │                                 ▼                                       │
//! │                         OrderDraft::from_view ──► OrderSubmitter        │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                               OrderConfirmation         │
//! │                                                 (then cart.clear())     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shipping is a flat fee per method and is not taxed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineItem};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductId, TaxRate};

// =============================================================================
// Cart View
// =============================================================================

/// Read-only access to cart contents.
///
/// Implemented by [`Cart`]; the checkout page and the order draft only
/// need these three reads.
pub trait CartView {
    fn items(&self) -> &[LineItem];
    fn item_count(&self) -> u64;
    fn subtotal(&self) -> Money;
}

impl CartView for Cart {
    fn items(&self) -> &[LineItem] {
        Cart::items(self)
    }

    fn item_count(&self) -> u64 {
        Cart::item_count(self)
    }

    fn subtotal(&self) -> Money {
        Cart::subtotal(self)
    }
}

/// Totals snapshot for the cart badge and the cart modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct products in the cart.
    pub distinct_items: u32,
    /// Units across all lines.
    #[ts(type = "number")]
    pub item_count: u64,
    pub subtotal: Money,
}

impl CartTotals {
    pub fn of<V: CartView + ?Sized>(view: &V) -> Self {
        CartTotals {
            distinct_items: u32::try_from(view.items().len()).unwrap_or(u32::MAX),
            item_count: view.item_count(),
            subtotal: view.subtotal(),
        }
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals::of(cart)
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Delivery option picked on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

/// Tax and shipping settings applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutPolicy {
    pub tax_rate: TaxRate,
    pub standard_shipping: Money,
    pub express_shipping: Money,
}

impl CheckoutPolicy {
    /// Flat shipping fee for a method.
    pub fn shipping_for(&self, method: ShippingMethod) -> Money {
        match method {
            ShippingMethod::Standard => self.standard_shipping,
            ShippingMethod::Express => self.express_shipping,
        }
    }
}

/// 7% tax, $10.00 standard and $20.00 express shipping.
impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy {
            tax_rate: TaxRate::from_bps(700),
            standard_shipping: Money::from_cents(1000),
            express_shipping: Money::from_cents(2000),
        }
    }
}

// =============================================================================
// Order Summary
// =============================================================================

/// The four figures shown in the checkout sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Computes the summary for the current cart contents.
    ///
    /// ## Formula
    /// ```text
    /// tax   = subtotal × tax_rate   (round half up to the cent)
    /// total = subtotal + shipping + tax
    /// ```
    pub fn compute<V: CartView + ?Sized>(
        view: &V,
        policy: &CheckoutPolicy,
        method: ShippingMethod,
    ) -> Self {
        let subtotal = view.subtotal();
        let shipping = policy.shipping_for(method);
        let tax = subtotal.calculate_tax(policy.tax_rate);

        OrderSummary {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// One line of an order about to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        OrderLine {
            product_id: item.product_id,
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Everything the order collaborator needs to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub shipping_method: ShippingMethod,
    pub summary: OrderSummary,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Builds a draft from the cart.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` if there is nothing to order
    pub fn from_view<V: CartView + ?Sized>(
        view: &V,
        policy: &CheckoutPolicy,
        method: ShippingMethod,
    ) -> CoreResult<Self> {
        if view.items().is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(OrderDraft {
            lines: view.items().iter().map(OrderLine::from).collect(),
            shipping_method: method,
            summary: OrderSummary::compute(view, policy, method),
            created_at: Utc::now(),
        })
    }

    /// Units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// What the order collaborator answers after accepting a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogSnapshot;

    fn cart_with(lines: &[(u64, i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, price, qty) in lines {
            let snap = CatalogSnapshot::new(
                ProductId::new(id),
                format!("Relic {}", id),
                Money::from_cents(price),
                10,
            );
            cart.add_units(&snap, qty);
        }
        cart
    }

    #[test]
    fn test_totals_snapshot() {
        let cart = cart_with(&[(1, 1000, 2), (2, 250, 3)]);
        let totals = CartTotals::from(&cart);

        assert_eq!(totals.distinct_items, 2);
        assert_eq!(totals.item_count, 5);
        assert_eq!(totals.subtotal, Money::from_cents(2750));
    }

    #[test]
    fn test_summary_standard_shipping() {
        // $50.00 subtotal, 7% tax = $3.50, $10.00 shipping
        let cart = cart_with(&[(1, 2500, 2)]);
        let summary =
            OrderSummary::compute(&cart, &CheckoutPolicy::default(), ShippingMethod::Standard);

        assert_eq!(summary.subtotal, Money::from_cents(5000));
        assert_eq!(summary.shipping, Money::from_cents(1000));
        assert_eq!(summary.tax, Money::from_cents(350));
        assert_eq!(summary.total, Money::from_cents(6350));
    }

    #[test]
    fn test_summary_express_shipping_is_not_taxed() {
        let cart = cart_with(&[(1, 1000, 1)]);
        let summary =
            OrderSummary::compute(&cart, &CheckoutPolicy::default(), ShippingMethod::Express);

        assert_eq!(summary.shipping, Money::from_cents(2000));
        assert_eq!(summary.tax, Money::from_cents(70));
        assert_eq!(summary.total, Money::from_cents(3070));
    }

    #[test]
    fn test_summary_tax_rounds_half_up() {
        // $0.50 × 7% = 3.5¢ → 4¢
        let cart = cart_with(&[(1, 50, 1)]);
        let summary =
            OrderSummary::compute(&cart, &CheckoutPolicy::default(), ShippingMethod::Standard);
        assert_eq!(summary.tax, Money::from_cents(4));
    }

    #[test]
    fn test_draft_from_empty_cart() {
        let result = OrderDraft::from_view(
            &Cart::new(),
            &CheckoutPolicy::default(),
            ShippingMethod::Standard,
        );
        assert_eq!(result, Err(CoreError::EmptyCart));
    }

    #[test]
    fn test_draft_lines() {
        let cart = cart_with(&[(4, 1200, 2), (2, 300, 1)]);
        let draft =
            OrderDraft::from_view(&cart, &CheckoutPolicy::default(), ShippingMethod::Express)
                .unwrap();

        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].product_id, ProductId::new(4));
        assert_eq!(draft.lines[0].line_total, Money::from_cents(2400));
        assert_eq!(draft.unit_count(), 3);
        assert_eq!(draft.shipping_method, ShippingMethod::Express);
        assert_eq!(draft.summary.subtotal, Money::from_cents(2700));
    }

    #[test]
    fn test_confirmation_wire_format() {
        let confirmation: OrderConfirmation =
            serde_json::from_str(r#"{"orderId":"ord_17","message":"Order placed"}"#).unwrap();
        assert_eq!(confirmation.order_id, "ord_17");
    }
}
