use std::time::Duration;

use async_trait::async_trait;
use common::{Cart, UserId};

use crate::Result;

/// Sliding expiration applied to every cart write: 7 days of
/// inactivity expires the cart. Refreshed on writes, not on reads.
pub const CART_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Derives the cache key for an owner's cart.
pub(crate) fn cart_key(owner: &UserId) -> String {
    format!("cart:{owner}")
}

/// Core trait for cart store implementations.
///
/// All implementations must be thread-safe (Send + Sync). The store
/// deals in whole documents: callers read the full cart, mutate a copy
/// in memory, and write the full copy back.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Reads the owner's cart. An expired entry reads the same as an
    /// absent one.
    async fn get(&self, owner: &UserId) -> Result<Option<Cart>>;

    /// Writes the whole cart document under a refreshed TTL.
    async fn put(&self, owner: &UserId, cart: &Cart, ttl: Duration) -> Result<()>;

    /// Removes the owner's cart. Deleting an absent cart is not an
    /// error.
    async fn delete(&self, owner: &UserId) -> Result<()>;
}
