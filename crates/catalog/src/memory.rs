use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, ProductId};

use crate::error::{CatalogError, Result};
use crate::reader::{CatalogReader, Product};

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    fail_get: HashSet<ProductId>,
    fail_adjust: HashSet<ProductId>,
    adjust_calls: Vec<(ProductId, i64)>,
}

/// In-memory catalog for tests and local runs.
///
/// Supports per-product failure injection so saga tests can exercise
/// every failure class, and records each attempted stock adjustment so
/// tests can assert exactly which decrements were issued.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogReader {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogReader {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product.
    pub fn insert(&self, product_id: impl Into<ProductId>, name: &str, price: Money, stock: u32) {
        self.state.write().unwrap().products.insert(
            product_id.into(),
            Product {
                name: name.to_string(),
                price,
                stock,
            },
        );
    }

    /// Overwrites a product's available stock.
    pub fn set_stock(&self, product_id: &ProductId, stock: u32) {
        if let Some(product) = self.state.write().unwrap().products.get_mut(product_id) {
            product.stock = stock;
        }
    }

    /// Returns a product's current stock, if it exists.
    pub fn stock_of(&self, product_id: &ProductId) -> Option<u32> {
        self.state
            .read()
            .unwrap()
            .products
            .get(product_id)
            .map(|p| p.stock)
    }

    /// Configures lookups for the given product to fail as unreachable.
    pub fn set_fail_get(&self, product_id: impl Into<ProductId>, fail: bool) {
        let mut state = self.state.write().unwrap();
        let id = product_id.into();
        if fail {
            state.fail_get.insert(id);
        } else {
            state.fail_get.remove(&id);
        }
    }

    /// Configures stock adjustments for the given product to fail as
    /// unreachable.
    pub fn set_fail_adjust(&self, product_id: impl Into<ProductId>, fail: bool) {
        let mut state = self.state.write().unwrap();
        let id = product_id.into();
        if fail {
            state.fail_adjust.insert(id);
        } else {
            state.fail_adjust.remove(&id);
        }
    }

    /// Returns every attempted stock adjustment in call order,
    /// including ones that failed.
    pub fn adjust_calls(&self) -> Vec<(ProductId, i64)> {
        self.state.read().unwrap().adjust_calls.clone()
    }

    /// Returns the number of attempted stock adjustments.
    pub fn adjust_call_count(&self) -> usize {
        self.state.read().unwrap().adjust_calls.len()
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalogReader {
    async fn get_product(&self, product_id: &ProductId) -> Result<Product> {
        let state = self.state.read().unwrap();
        if state.fail_get.contains(product_id) {
            return Err(CatalogError::Unavailable("injected outage".to_string()));
        }
        state
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }

    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<u32> {
        let mut state = self.state.write().unwrap();
        state.adjust_calls.push((product_id.clone(), delta));

        if state.fail_adjust.contains(product_id) {
            return Err(CatalogError::Unavailable("injected outage".to_string()));
        }

        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;

        let new_stock = i64::from(product.stock) + delta;
        if new_stock < 0 {
            return Err(CatalogError::InsufficientStock(product_id.clone()));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            product.stock = new_stock as u32;
        }
        Ok(product.stock)
    }
}
