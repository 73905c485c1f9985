//! Catalog client error types.

use common::ProductId;
use thiserror::Error;

/// Errors returned by catalog operations.
///
/// Raw transport errors never leave this crate; they are folded into
/// [`CatalogError::Unavailable`] at the client boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no such product.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// A stock adjustment would take available stock below zero. The
    /// authoritative check lives in the catalog service.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The catalog could not be reached or did not answer in time.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog answered with a status or body this client does not
    /// understand.
    #[error("unexpected catalog response (status {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
