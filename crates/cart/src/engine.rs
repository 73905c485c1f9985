//! Cart mutation and read operations.

use cart_store::{CART_TTL, CartStore};
use catalog::{CatalogError, CatalogReader};
use common::{Cart, LineItem, ProductId, UserId};
use futures_util::future::join_all;

use crate::error::{CartError, Result};
use crate::view::{EnrichedCart, EnrichedLine};

/// The cart logic layer.
///
/// Each operation is one read-modify-write cycle against the cart
/// store, consulting the catalog for stock and pricing truth before
/// the cart is touched.
pub struct CartEngine<S, C> {
    store: S,
    catalog: C,
}

fn lookup_error(err: CatalogError) -> CartError {
    match err {
        CatalogError::NotFound(id) => CartError::ProductNotFound(id),
        other => CartError::Catalog(other),
    }
}

impl<S: CartStore, C: CatalogReader> CartEngine<S, C> {
    /// Creates a new cart engine over the given store and catalog.
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Adds `quantity` of a product to the owner's cart, creating the
    /// cart if it does not exist.
    ///
    /// Merging into an existing line keeps the original unit price
    /// snapshot and does not re-check the combined quantity against
    /// stock; only the requested quantity is verified.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        owner: &UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let product = self
            .catalog
            .get_product(&product_id)
            .await
            .map_err(lookup_error)?;
        if product.stock < quantity {
            return Err(CartError::InsufficientStock {
                product_id,
                available: product.stock,
                requested: quantity,
            });
        }

        let mut cart = self.store.get(owner).await?.unwrap_or_default();
        match cart.line_mut(&product_id) {
            Some(line) => line.quantity += quantity,
            None => cart
                .items
                .push(LineItem::new(product_id, product.name, quantity, product.price)),
        }
        cart.recompute_total();

        self.store.put(owner, &cart, CART_TTL).await?;
        metrics::counter!("cart_operations_total", "op" => "add").increment(1);
        Ok(cart)
    }

    /// Overwrites a line's quantity; quantity 0 removes the line.
    ///
    /// Fails if the owner has no cart or the cart has no line for the
    /// product. Non-zero quantities are re-verified against current
    /// stock; the price snapshot is never rewritten here.
    #[tracing::instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        owner: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart> {
        let mut cart = self.store.get(owner).await?.ok_or(CartError::CartNotFound)?;
        if cart.line(product_id).is_none() {
            return Err(CartError::LineNotFound(product_id.clone()));
        }

        if quantity == 0 {
            cart.remove_line(product_id);
        } else {
            let product = self
                .catalog
                .get_product(product_id)
                .await
                .map_err(lookup_error)?;
            if product.stock < quantity {
                return Err(CartError::InsufficientStock {
                    product_id: product_id.clone(),
                    available: product.stock,
                    requested: quantity,
                });
            }
            if let Some(line) = cart.line_mut(product_id) {
                line.quantity = quantity;
            }
        }
        cart.recompute_total();

        self.store.put(owner, &cart, CART_TTL).await?;
        metrics::counter!("cart_operations_total", "op" => "update").increment(1);
        Ok(cart)
    }

    /// Filters a line out of the owner's cart.
    ///
    /// Idempotent: an absent cart or absent line is not an error; the
    /// resulting cart is written back regardless, with its total
    /// recomputed.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, owner: &UserId, product_id: &ProductId) -> Result<Cart> {
        let mut cart = self.store.get(owner).await?.unwrap_or_default();
        cart.remove_line(product_id);
        cart.recompute_total();

        self.store.put(owner, &cart, CART_TTL).await?;
        metrics::counter!("cart_operations_total", "op" => "remove").increment(1);
        Ok(cart)
    }

    /// Returns the owner's cart enriched with live product data for
    /// display.
    ///
    /// An absent cart reads as an empty zero-total cart. Enrichment is
    /// best-effort: a failed product lookup leaves the line unenriched
    /// rather than dropping it; the stored line is the source of
    /// truth for quantity and price.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, owner: &UserId) -> Result<EnrichedCart> {
        let Some(cart) = self.store.get(owner).await? else {
            return Ok(EnrichedCart::empty());
        };

        let catalog = &self.catalog;
        let lookups = cart.items.iter().map(|item| async move {
            let product = match catalog.get_product(&item.product_id).await {
                Ok(product) => Some(product),
                Err(err) => {
                    tracing::debug!(
                        product_id = %item.product_id,
                        error = %err,
                        "cart line left unenriched"
                    );
                    None
                }
            };
            EnrichedLine {
                item: item.clone(),
                product,
            }
        });

        Ok(EnrichedCart {
            items: join_all(lookups).await,
            total: cart.total,
        })
    }

    /// Unconditionally deletes the owner's cart.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, owner: &UserId) -> Result<()> {
        self.store.delete(owner).await?;
        metrics::counter!("cart_operations_total", "op" => "clear").increment(1);
        Ok(())
    }
}
