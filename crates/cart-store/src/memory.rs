use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{Cart, UserId};
use tokio::sync::RwLock;

use crate::store::{CartStore, cart_key};
use crate::Result;

struct Entry {
    cart: Cart,
    expires_at: Instant,
}

/// In-memory cart store for tests and local runs.
///
/// Mirrors the Redis implementation's semantics: whole-document writes
/// with a per-entry expiry, reads past expiry behave like an absent
/// key. Expired entries linger until overwritten or deleted; they are
/// never served.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live (unexpired) carts.
    pub async fn live_count(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn get(&self, owner: &UserId) -> Result<Option<Cart>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&cart_key(owner))
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.cart.clone()))
    }

    async fn put(&self, owner: &UserId, cart: &Cart, ttl: Duration) -> Result<()> {
        let entry = Entry {
            cart: cart.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(cart_key(owner), entry);
        Ok(())
    }

    async fn delete(&self, owner: &UserId) -> Result<()> {
        self.entries.write().await.remove(&cart_key(owner));
        Ok(())
    }
}
