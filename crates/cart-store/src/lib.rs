//! Key-value cart storage with sliding expiration.
//!
//! The cart store holds one whole `Cart` document per owner under an
//! owner-scoped key. Every write replaces the full document and
//! refreshes its time-to-live; reads never extend it. There is no
//! partial-field update and no cross-request locking: two concurrent
//! read-modify-write cycles for the same owner resolve last-writer-wins
//! on the whole document.

pub mod error;
pub mod memory;
pub mod redis;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryCartStore;
pub use self::redis::RedisCartStore;
pub use store::{CART_TTL, CartStore};
