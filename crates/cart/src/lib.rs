//! Cart engine.
//!
//! The logic layer over the cart store: every operation reads the full
//! current cart, mutates an in-memory copy, recomputes the total, and
//! writes the full copy back under a refreshed TTL. Stock and pricing
//! truth comes from the catalog at each mutation.
//!
//! There is no lock around the read-modify-write cycle: two concurrent
//! mutations for the same owner resolve last-writer-wins on the whole
//! cart document. That is an accepted trade-off for a single-user,
//! low-contention cart.

pub mod engine;
pub mod error;
pub mod view;

pub use engine::CartEngine;
pub use error::CartError;
pub use view::{EnrichedCart, EnrichedLine};
