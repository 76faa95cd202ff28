//! Order collaborator seam.
//!
//! The Bazaar hands finished carts to an order service it does not own.
//! [`CartSession::checkout`](crate::CartSession::checkout) talks to it only
//! through this trait.

use std::future::Future;

use aegyptus_core::{OrderConfirmation, OrderDraft};

use crate::error::StoreResult;

/// Creates orders from drafts.
///
/// Return `StoreError::CheckoutRejected` when the service refuses the
/// order; the cart is kept intact in that case.
pub trait OrderSubmitter: Send + Sync {
    fn submit(&self, draft: &OrderDraft)
        -> impl Future<Output = StoreResult<OrderConfirmation>> + Send;
}
