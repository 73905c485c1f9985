//! The checkout saga driver.

use cart_store::CartStore;
use catalog::CatalogReader;
use chrono::Utc;
use common::{ProductId, UserId};
use futures_util::future::join_all;

use crate::error::CheckoutError;
use crate::order::{Order, OrderId, OrderStatus};

/// Drives the checkout saga for one owner at a time.
///
/// The orchestrator reads the cart once, never mutates it, and deletes
/// it only after the order is confirmed. It holds no state between
/// invocations.
pub struct CheckoutOrchestrator<S, C> {
    store: S,
    catalog: C,
}

impl<S: CartStore, C: CatalogReader> CheckoutOrchestrator<S, C> {
    /// Creates a new orchestrator over the given store and catalog.
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Runs the checkout saga: load, verify, decrement, materialize,
    /// clear.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(&self, owner: &UserId) -> Result<Order, CheckoutError> {
        metrics::counter!("checkout_total").increment(1);
        let started = std::time::Instant::now();

        // Load. Terminal on absent/empty, nothing touched.
        let cart = self
            .store
            .get(owner)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(CheckoutError::EmptyCart)?;

        // Verify every line before touching any stock. Verification of
        // distinct lines has no ordering dependency, so the lookups
        // fan out; results are inspected in cart order so the product
        // named on failure is deterministic.
        let catalog = &self.catalog;
        let verifications = cart.items.iter().map(|line| async move {
            (line, catalog.get_product(&line.product_id).await)
        });
        for (line, fetched) in join_all(verifications).await {
            let available = match fetched {
                Ok(product) => product.stock,
                Err(err) => {
                    // Unconfirmable stock aborts the same way a known
                    // shortfall does: before any decrement, so the
                    // failure is fully retry-safe.
                    tracing::warn!(
                        product_id = %line.product_id,
                        error = %err,
                        "stock verification failed"
                    );
                    0
                }
            };
            if available < line.quantity {
                metrics::counter!("checkout_rejections_total").increment(1);
                return Err(CheckoutError::InsufficientStock(line.product_id.clone()));
            }
        }

        // Decrement, strictly in cart item order and one at a time, so
        // the record of which lines succeeded before a failure is
        // unambiguous and reproducible.
        let mut decremented: Vec<ProductId> = Vec::new();
        for line in &cart.items {
            match catalog
                .adjust_stock(&line.product_id, -i64::from(line.quantity))
                .await
            {
                Ok(_) => decremented.push(line.product_id.clone()),
                Err(err) => {
                    metrics::counter!("checkout_failures_total").increment(1);
                    tracing::error!(
                        user_id = %owner,
                        failed_product = %line.product_id,
                        decremented = ?decremented,
                        error = %err,
                        "checkout stopped mid-decrement; decremented stock was not restored"
                    );
                    return Err(CheckoutError::Failed {
                        decremented,
                        failed: line.product_id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        // Materialize the order. The snapshot is a copy: later cart
        // mutations cannot alias into it.
        let order = Order {
            order_id: OrderId::generate(),
            user_id: owner.clone(),
            items: cart.items.clone(),
            total: cart.total,
            status: OrderStatus::Confirmed,
            created_at: Utc::now(),
        };

        // Clear the cart. The order is already confirmed, so a failed
        // delete leaves a stale cart behind (it dies by TTL) but must
        // not fail the checkout.
        if let Err(err) = self.store.delete(owner).await {
            tracing::warn!(
                user_id = %owner,
                order_id = %order.order_id,
                error = %err,
                "cart delete failed after confirmed order"
            );
        }

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        tracing::info!(
            user_id = %owner,
            order_id = %order.order_id,
            total = %order.total,
            lines = order.items.len(),
            "checkout confirmed"
        );

        Ok(order)
    }
}
