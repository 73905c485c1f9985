//! HTTP surface for the cart and checkout core.
//!
//! Exposes the cart engine and checkout orchestrator over REST, with
//! bearer-token authentication delegated to the identity service,
//! structured logging (tracing), and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use cart::CartEngine;
use cart_store::CartStore;
use catalog::CatalogReader;
use checkout::CheckoutOrchestrator;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::IdentityVerifier;
use routes::cart::AppState;

/// Builds the shared application state from the process-scoped
/// resource handles created at startup.
pub fn create_state<S, C, V>(store: S, catalog: C, identity: V) -> Arc<AppState<S, C, V>>
where
    S: CartStore + Clone,
    C: CatalogReader + Clone,
    V: IdentityVerifier,
{
    Arc::new(AppState {
        engine: CartEngine::new(store.clone(), catalog.clone()),
        checkout: CheckoutOrchestrator::new(store, catalog),
        identity,
    })
}

/// Creates the Axum application router with all routes and shared
/// state.
pub fn create_app<S, C, V>(
    state: Arc<AppState<S, C, V>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::show::<S, C, V>))
        .route("/cart", delete(routes::cart::clear::<S, C, V>))
        .route("/cart/items", post(routes::cart::add_item::<S, C, V>))
        .route(
            "/cart/items/{product_id}",
            put(routes::cart::update_item::<S, C, V>),
        )
        .route(
            "/cart/items/{product_id}",
            delete(routes::cart::remove_item::<S, C, V>),
        )
        .route("/cart/checkout", post(routes::cart::checkout::<S, C, V>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
