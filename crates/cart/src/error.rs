//! Cart engine error types.

use cart_store::StoreError;
use catalog::CatalogError;
use common::ProductId;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is not usable for this operation.
    /// Rejected before any lookup or mutation.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// The catalog has no such product.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Available stock does not cover the requested quantity.
    #[error(
        "insufficient stock for product {product_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// No cart exists for this owner.
    #[error("cart not found")]
    CartNotFound,

    /// The cart has no line for this product.
    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),

    /// Cart store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Catalog failure that is not a definitive not-found answer.
    #[error("catalog error: {0}")]
    Catalog(CatalogError),
}

/// Convenience type alias for cart engine results.
pub type Result<T> = std::result::Result<T, CartError>;
