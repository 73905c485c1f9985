//! The cart document persisted by the cart store.

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// One product's quantity and price snapshot within a cart.
///
/// `unit_price` and `name` are snapshots taken from the catalog when
/// the line was first added; later catalog changes do not rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a new line item. Quantity 0 lines are never stored; the
    /// engine removes them instead.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line (quantity × unit price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Ephemeral per-owner collection of line items with a derived total.
///
/// The stored `total` is a cache of `Σ line_total` and is recomputed
/// before every write; it is never patched independently of the items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<LineItem>,
    pub total: Money,
}

impl Cart {
    /// Returns an empty zero-total cart.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the line for the given product, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Returns a mutable reference to the line for the given product.
    pub fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }

    /// Filters the line for the given product out of the cart.
    ///
    /// Returns true if a line was removed. Removing an absent line is
    /// a no-op, not an error.
    pub fn remove_line(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    /// Recomputes `total` from the current lines.
    ///
    /// Must be called after every mutation, before the cart is written
    /// back to the store.
    pub fn recompute_total(&mut self) {
        self.total = self.items.iter().map(LineItem::line_total).sum();
    }
}
