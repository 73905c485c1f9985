//! Shared value objects for the cart and checkout services.
//!
//! Everything here is plain data: no I/O, no async. The `Cart` and
//! `LineItem` documents defined in this crate are the exact shapes
//! persisted by the cart store and copied into orders at checkout.

pub mod cart;
pub mod types;

pub use cart::{Cart, LineItem};
pub use types::{Money, ProductId, UserId};
