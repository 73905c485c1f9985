use async_trait::async_trait;
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Current catalog truth for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Money,
    pub stock: u32,
}

/// Trait for catalog operations used by the cart and checkout cores.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Fetches the current price, name, and available stock for a
    /// product.
    async fn get_product(&self, product_id: &ProductId) -> Result<Product>;

    /// Applies a signed stock delta and returns the new stock level.
    ///
    /// Fails with [`CatalogError::InsufficientStock`] if the result
    /// would go negative; the catalog service is the authority for
    /// that check.
    ///
    /// [`CatalogError::InsufficientStock`]: crate::CatalogError::InsufficientStock
    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<u32>;
}
