use std::time::Duration;

use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;
use async_trait::async_trait;
use common::{Cart, UserId};

use crate::error::StoreError;
use crate::store::{CartStore, cart_key};
use crate::Result;

/// Redis-backed cart store.
///
/// Cart documents are stored as JSON strings under owner-scoped keys
/// and written with `SET ... EX`, so every write refreshes the sliding
/// expiration. The connection manager is created once at startup and
/// handed in; it multiplexes and reconnects internally, so cloning the
/// store clones a cheap handle to the same connection.
///
/// Every command is bounded by `op_timeout`; a command that does not
/// answer in time fails the request the same way an unreachable
/// backend would.
#[derive(Clone)]
pub struct RedisCartStore {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCartStore {
    /// Wraps an existing connection manager.
    pub fn new(conn: ConnectionManager, op_timeout: Duration) -> Self {
        Self { conn, op_timeout }
    }

    /// Connects to Redis and builds the store. The connection attempt
    /// itself is bounded by `op_timeout`.
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self> {
        let client = ::redis::Client::open(url)?;
        let conn = tokio::time::timeout(op_timeout, client.get_connection_manager())
            .await
            .map_err(|_| StoreError::Timeout(op_timeout))??;
        tracing::debug!("redis connection manager established");
        Ok(Self::new(conn, op_timeout))
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = ::redis::RedisResult<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.op_timeout))?
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl CartStore for RedisCartStore {
    async fn get(&self, owner: &UserId) -> Result<Option<Cart>> {
        let key = cart_key(owner);
        let mut conn = self.conn.clone();

        let raw: Option<String> = self.bounded(conn.get(&key)).await?;
        match raw {
            None => Ok(None),
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|source| StoreError::Corrupt { key, source }),
        }
    }

    async fn put(&self, owner: &UserId, cart: &Cart, ttl: Duration) -> Result<()> {
        let key = cart_key(owner);
        let payload = serde_json::to_string(cart).map_err(|source| StoreError::Serialize {
            key: key.clone(),
            source,
        })?;

        // SET EX rejects a zero expiry; a sub-second TTL still rounds
        // up to one second.
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();
        let () = self.bounded(conn.set_ex(&key, payload, seconds)).await?;
        Ok(())
    }

    async fn delete(&self, owner: &UserId) -> Result<()> {
        let key = cart_key(owner);
        let mut conn = self.conn.clone();
        let () = self.bounded(conn.del(&key)).await?;
        Ok(())
    }
}
