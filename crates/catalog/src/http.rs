use async_trait::async_trait;
use common::{Money, ProductId};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::reader::{CatalogReader, Product};

/// HTTP client for the catalog service.
///
/// Wraps a shared `reqwest::Client`; the client's request timeout is
/// the bound on every catalog call, so a hung catalog fails the
/// request instead of wedging it.
#[derive(Clone)]
pub struct HttpCatalogReader {
    client: reqwest::Client,
    base_url: String,
}

/// Product document as served by the catalog. Prices travel as decimal
/// dollars on the wire and are held as integer cents internally.
#[derive(Debug, Deserialize)]
struct ProductPayload {
    name: String,
    price: f64,
    stock: u32,
}

impl From<ProductPayload> for Product {
    fn from(payload: ProductPayload) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let cents = (payload.price * 100.0).round() as i64;
        Product {
            name: payload.name,
            price: Money::from_cents(cents),
            stock: payload.stock,
        }
    }
}

#[derive(Serialize)]
struct AdjustStockRequest {
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct AdjustStockResponse {
    product: StockPayload,
}

#[derive(Debug, Deserialize)]
struct StockPayload {
    stock: u32,
}

impl HttpCatalogReader {
    /// Creates a catalog client against the given base URL.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn product_url(&self, product_id: &ProductId) -> String {
        format!("{}/products/{}", self.base_url, product_id)
    }
}

fn transport_error(err: reqwest::Error) -> CatalogError {
    CatalogError::Unavailable(err.to_string())
}

async fn unexpected(response: reqwest::Response) -> CatalogError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status, "unexpected catalog response");
    CatalogError::UnexpectedResponse { status, body }
}

#[async_trait]
impl CatalogReader for HttpCatalogReader {
    async fn get_product(&self, product_id: &ProductId) -> Result<Product> {
        let response = self
            .client
            .get(self.product_url(product_id))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(product_id.clone())),
            status if status.is_success() => {
                let payload: ProductPayload = response.json().await.map_err(transport_error)?;
                Ok(payload.into())
            }
            _ => Err(unexpected(response).await),
        }
    }

    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<u32> {
        let response = self
            .client
            .patch(format!("{}/stock", self.product_url(product_id)))
            .json(&AdjustStockRequest { quantity: delta })
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(product_id.clone())),
            StatusCode::BAD_REQUEST => Err(CatalogError::InsufficientStock(product_id.clone())),
            status if status.is_success() => {
                let payload: AdjustStockResponse =
                    response.json().await.map_err(transport_error)?;
                Ok(payload.product.stock)
            }
            _ => Err(unexpected(response).await),
        }
    }
}
