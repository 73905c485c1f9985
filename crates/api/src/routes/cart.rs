//! Cart and checkout endpoints.
//!
//! All endpoints operate on the authenticated principal's own cart;
//! the owner is never taken from the request body or path.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use cart::{CartEngine, EnrichedCart, EnrichedLine};
use cart_store::CartStore;
use catalog::{CatalogReader, Product};
use checkout::{CheckoutOrchestrator, Order};
use common::{Cart, LineItem, ProductId};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, IdentityVerifier};
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, C, V> {
    pub engine: CartEngine<S, C>,
    pub checkout: CheckoutOrchestrator<S, C>,
    pub identity: V,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Serialize)]
pub struct LineItemResponse {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    /// Live catalog data, present only on enriched reads and only when
    /// the lookup succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductResponse>,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<LineItemResponse>,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub status: String,
    pub items: Vec<LineItemResponse>,
    pub total_cents: i64,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order: OrderResponse,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            price_cents: product.price.cents(),
            stock: product.stock,
        }
    }
}

fn line_response(item: &LineItem, product: Option<Product>) -> LineItemResponse {
    LineItemResponse {
        product_id: item.product_id.to_string(),
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price_cents: item.unit_price.cents(),
        line_total_cents: item.line_total().cents(),
        product: product.map(ProductResponse::from),
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            items: cart.items.iter().map(|item| line_response(item, None)).collect(),
            total_cents: cart.total.cents(),
        }
    }
}

impl From<EnrichedCart> for CartResponse {
    fn from(view: EnrichedCart) -> Self {
        Self {
            items: view
                .items
                .into_iter()
                .map(|EnrichedLine { item, product }| line_response(&item, product))
                .collect(),
            total_cents: view.total.cents(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            status: order.status.to_string(),
            items: order
                .items
                .iter()
                .map(|item| line_response(item, None))
                .collect(),
            total_cents: order.total.cents(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

fn parse_quantity(raw: i64) -> Result<u32, ApiError> {
    u32::try_from(raw).map_err(|_| ApiError::BadRequest(format!("invalid quantity: {raw}")))
}

// -- Handlers --

/// GET /cart — the principal's cart with enriched items.
#[tracing::instrument(skip(state))]
pub async fn show<S, C, V>(
    State(state): State<Arc<AppState<S, C, V>>>,
    AuthUser(principal): AuthUser,
) -> Result<Json<CartResponse>, ApiError>
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    let view = state.engine.get_cart(&principal.user_id).await?;
    Ok(Json(view.into()))
}

/// POST /cart/items — add a product to the cart.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<S, C, V>(
    State(state): State<Arc<AppState<S, C, V>>>,
    AuthUser(principal): AuthUser,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError>
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    let quantity = parse_quantity(req.quantity.unwrap_or(1))?;
    let cart = state
        .engine
        .add_item(&principal.user_id, ProductId::new(req.product_id), quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// PUT /cart/items/{product_id} — overwrite a line's quantity;
/// quantity 0 removes the line.
#[tracing::instrument(skip(state, req))]
pub async fn update_item<S, C, V>(
    State(state): State<Arc<AppState<S, C, V>>>,
    AuthUser(principal): AuthUser,
    Path(product_id): Path<String>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError>
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    let quantity = parse_quantity(req.quantity)?;
    let cart = state
        .engine
        .update_quantity(&principal.user_id, &ProductId::new(product_id), quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /cart/items/{product_id} — idempotent line removal.
#[tracing::instrument(skip(state))]
pub async fn remove_item<S, C, V>(
    State(state): State<Arc<AppState<S, C, V>>>,
    AuthUser(principal): AuthUser,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError>
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    let cart = state
        .engine
        .remove_item(&principal.user_id, &ProductId::new(product_id))
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /cart — clear the principal's cart.
#[tracing::instrument(skip(state))]
pub async fn clear<S, C, V>(
    State(state): State<Arc<AppState<S, C, V>>>,
    AuthUser(principal): AuthUser,
) -> Result<StatusCode, ApiError>
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    state.engine.clear(&principal.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /cart/checkout — run the checkout saga.
#[tracing::instrument(skip(state))]
pub async fn checkout<S, C, V>(
    State(state): State<Arc<AppState<S, C, V>>>,
    AuthUser(principal): AuthUser,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    let order = state.checkout.checkout(&principal.user_id).await?;
    Ok(Json(CheckoutResponse {
        order: order.into(),
    }))
}
