//! Integration tests for the API server, exercised through the router
//! with in-memory collaborators.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use cart_store::{CartStore, InMemoryCartStore};
use catalog::InMemoryCatalogReader;
use common::{Money, ProductId, UserId};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

use api::auth::{Principal, StaticIdentityVerifier};
use api::routes::cart::AppState;

const TOKEN: &str = "test-token";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn test_principal() -> Principal {
    Principal {
        user_id: UserId::new("u1"),
        role: "customer".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

type TestState = Arc<AppState<InMemoryCartStore, InMemoryCatalogReader, StaticIdentityVerifier>>;

fn setup() -> (axum::Router, InMemoryCartStore, InMemoryCatalogReader) {
    let store = InMemoryCartStore::new();
    let catalog = InMemoryCatalogReader::new();
    catalog.insert("p1", "Widget", Money::from_cents(1000), 10);
    catalog.insert("p2", "Gadget", Money::from_cents(2500), 3);

    let identity = StaticIdentityVerifier::new(TOKEN, test_principal());
    let state: TestState = api::create_state(store.clone(), catalog.clone(), identity);
    let app = api::create_app(state, get_metrics_handle());
    (app, store, catalog)
}

fn authed(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

fn json_body(value: serde_json::Value) -> Body {
    Body::from(serde_json::to_string(&value).unwrap())
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn add_item(app: &axum::Router, product_id: &str, quantity: i64) -> axum::response::Response {
    app.clone()
        .oneshot(
            authed("POST", "/cart/items")
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(serde_json::json!({
                    "product_id": product_id,
                    "quantity": quantity
                })))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "cart-service");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _, catalog) = setup();

    let response = app
        .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(catalog.adjust_call_count(), 0);
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart/checkout")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_cart_reads_as_zero_total() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(authed("GET", "/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["total_cents"], 0);
}

#[tokio::test]
async fn test_add_item_and_get_cart() {
    let (app, _, _) = setup();

    let response = add_item(&app, "p1", 2).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["total_cents"], 2000);

    let response = app
        .oneshot(authed("GET", "/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = response_json(response).await;
    assert_eq!(json["items"][0]["product_id"], "p1");
    assert_eq!(json["items"][0]["quantity"], 2);
    assert_eq!(json["items"][0]["line_total_cents"], 2000);
    // Enriched read carries live catalog data.
    assert_eq!(json["items"][0]["product"]["stock"], 10);
    assert_eq!(json["total_cents"], 2000);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let (app, _, _) = setup();

    let response = add_item(&app, "ghost", 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["code"], "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn test_add_beyond_stock_is_conflict() {
    let (app, _, _) = setup();

    let response = add_item(&app, "p2", 4).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = response_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
}

#[tokio::test]
async fn test_negative_quantity_is_invalid_argument() {
    let (app, _, _) = setup();

    let response = add_item(&app, "p1", -1).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_update_to_zero_removes_the_line() {
    let (app, _, _) = setup();

    add_item(&app, "p1", 2).await;

    let response = app
        .clone()
        .oneshot(
            authed("PUT", "/cart/items/p1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(serde_json::json!({ "quantity": 0 })))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["total_cents"], 0);
}

#[tokio::test]
async fn test_update_without_a_cart_is_not_found() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            authed("PUT", "/cart/items/p1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(serde_json::json!({ "quantity": 1 })))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["code"], "CART_NOT_FOUND");
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let (app, _, _) = setup();

    add_item(&app, "p1", 1).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed("DELETE", "/cart/items/p1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["items"].as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn test_clear_cart() {
    let (app, store, _) = setup();

    add_item(&app, "p1", 1).await;

    let response = app
        .clone()
        .oneshot(authed("DELETE", "/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.get(&UserId::new("u1")).await.unwrap(), None);
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let (app, _, catalog) = setup();

    let response = app
        .oneshot(authed("POST", "/cart/checkout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["code"], "EMPTY_CART");
    assert_eq!(catalog.adjust_call_count(), 0);
}

#[tokio::test]
async fn test_checkout_success() {
    let (app, _, catalog) = setup();

    add_item(&app, "p1", 2).await;
    add_item(&app, "p2", 1).await;

    let response = app
        .clone()
        .oneshot(authed("POST", "/cart/checkout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    let order = &json["order"];
    assert!(order["order_id"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(order["status"], "confirmed");
    assert_eq!(order["total_cents"], 4500);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    assert_eq!(catalog.stock_of(&ProductId::new("p1")), Some(8));
    assert_eq!(catalog.stock_of(&ProductId::new("p2")), Some(2));

    // The cart is gone immediately afterward.
    let response = app
        .oneshot(authed("GET", "/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = response_json(response).await;
    assert_eq!(json["total_cents"], 0);
}

#[tokio::test]
async fn test_checkout_shortfall_is_retry_safe_conflict() {
    let (app, _, catalog) = setup();

    add_item(&app, "p2", 3).await;
    catalog.set_stock(&ProductId::new("p2"), 1);

    let response = app
        .oneshot(authed("POST", "/cart/checkout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = response_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    assert_eq!(catalog.adjust_call_count(), 0);
}

#[tokio::test]
async fn test_partial_checkout_failure_has_a_distinct_code() {
    let (app, store, catalog) = setup();

    add_item(&app, "p1", 1).await;
    add_item(&app, "p2", 1).await;
    catalog.set_fail_adjust("p2", true);

    let response = app
        .oneshot(authed("POST", "/cart/checkout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = response_json(response).await;
    assert_eq!(json["code"], "CHECKOUT_FAILED");

    // p1 was decremented, the cart was not cleared.
    assert_eq!(catalog.stock_of(&ProductId::new("p1")), Some(9));
    assert!(store.get(&UserId::new("u1")).await.unwrap().is_some());
}
