//! Checkout error types, one variant per terminal failure class.

use cart_store::StoreError;
use common::ProductId;
use thiserror::Error;

/// Errors that can terminate a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The owner has no cart, or the cart has no lines. Nothing was
    /// touched; safe to retry after adding items.
    #[error("cart is empty")]
    EmptyCart,

    /// A line's stock could not be confirmed before any decrement was
    /// issued. Nothing was touched; safe to retry after the cart is
    /// adjusted.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The decrement sweep stopped partway: stock for `decremented`
    /// lines is already gone and was not restored. Not fully
    /// retry-safe; callers must not blindly re-attempt.
    #[error("checkout failed at product {failed}: {reason}")]
    Failed {
        decremented: Vec<ProductId>,
        failed: ProductId,
        reason: String,
    },

    /// Cart store failure while loading the cart. Nothing was touched.
    #[error(transparent)]
    Store(#[from] StoreError),
}
