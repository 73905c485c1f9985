//! Checkout orchestration.
//!
//! Checkout is a saga, not a transaction: the cart store and the
//! catalog service share no atomic commit, so the orchestrator
//! sequences irreversible steps in an order that keeps every failure
//! class either fully safe to retry or precisely described:
//!
//! 1. Load the cart (absent/empty is terminal, nothing touched).
//! 2. Verify stock for every line (terminal on shortfall, nothing
//!    touched).
//! 3. Decrement stock line by line, in cart order (a mid-sweep failure
//!    reports exactly which lines were already decremented).
//! 4. Materialize the immutable order.
//! 5. Clear the cart (failure here is logged, never reported: the
//!    order is already confirmed).
//!
//! There is no compensation step for partial decrements; the partial
//! state is surfaced and logged for out-of-band reconciliation.

pub mod error;
pub mod orchestrator;
pub mod order;

pub use error::CheckoutError;
pub use orchestrator::CheckoutOrchestrator;
pub use order::{Order, OrderId, OrderStatus};
