//! API error types with HTTP response mapping.
//!
//! Every failure serializes as `{"error": ..., "code": ...}` so
//! clients can branch on the machine-readable code. The distinction
//! that matters most: `INSUFFICIENT_STOCK` and `EMPTY_CART` are safe
//! to retry after editing the cart, while `CHECKOUT_FAILED` means
//! stock was partially decremented and a blind retry would decrement
//! it again.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;
use checkout::CheckoutError;

use crate::auth::AuthError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or rejected credential. No cart operation ran.
    Unauthorized(AuthError),
    /// Malformed request from the client.
    BadRequest(String),
    /// Cart engine error.
    Cart(CartError),
    /// Checkout saga error.
    Checkout(CheckoutError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(err) => {
                tracing::debug!(error = %err, "request rejected as unauthorized");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "invalid or missing credentials".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg),
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_to_response(err: CartError) -> (StatusCode, &'static str, String) {
    match &err {
        CartError::InvalidQuantity(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", err.to_string())
        }
        CartError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND", err.to_string())
        }
        CartError::CartNotFound => (StatusCode::NOT_FOUND, "CART_NOT_FOUND", err.to_string()),
        CartError::LineNotFound(_) => (StatusCode::NOT_FOUND, "LINE_NOT_FOUND", err.to_string()),
        CartError::InsufficientStock { .. } => {
            (StatusCode::CONFLICT, "INSUFFICIENT_STOCK", err.to_string())
        }
        CartError::Store(_) | CartError::Catalog(_) => {
            tracing::error!(error = %err, "cart operation failed on a backing service");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "internal server error".to_string(),
            )
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, &'static str, String) {
    match &err {
        CheckoutError::EmptyCart => (StatusCode::BAD_REQUEST, "EMPTY_CART", err.to_string()),
        CheckoutError::InsufficientStock(_) => {
            (StatusCode::CONFLICT, "INSUFFICIENT_STOCK", err.to_string())
        }
        // Partial decrement: distinct code and status so clients never
        // mistake it for a retry-safe rejection.
        CheckoutError::Failed { .. } => (StatusCode::BAD_GATEWAY, "CHECKOUT_FAILED", err.to_string()),
        CheckoutError::Store(_) => {
            tracing::error!(error = %err, "checkout could not load the cart");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "internal server error".to_string(),
            )
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err)
    }
}
