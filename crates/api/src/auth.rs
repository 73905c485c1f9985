//! Bearer-token authentication against the identity service.
//!
//! The core treats identity as an opaque capability check: the bearer
//! credential is forwarded to the identity verifier, which either
//! returns the authenticated principal or rejects it. Any failure is
//! `Unauthorized` and no cart operation runs.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use cart_store::CartStore;
use catalog::CatalogReader;
use common::UserId;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiError;
use crate::routes::cart::AppState;

/// Authenticated principal returned by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
}

/// Authentication failures. All of them surface as `Unauthorized`;
/// the variants exist for logging.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("credential rejected by the identity service")]
    InvalidToken,

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Trait for verifying bearer credentials.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Returns the principal for a valid credential.
    async fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Wire shape of the identity service's verify endpoint.
#[derive(Deserialize)]
struct VerifyResponse {
    user: Principal,
}

/// HTTP client for the identity service.
///
/// The shared `reqwest::Client`'s request timeout bounds every
/// verification call.
#[derive(Clone)]
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityVerifier {
    /// Creates a verifier against the given base URL.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let response = self
            .client
            .get(format!("{}/verify", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|err| AuthError::Unavailable(err.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let payload: VerifyResponse = response
                    .json()
                    .await
                    .map_err(|err| AuthError::Unavailable(err.to_string()))?;
                Ok(payload.user)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            status => Err(AuthError::Unavailable(format!(
                "identity service returned {status}"
            ))),
        }
    }
}

/// Fixed-principal verifier for tests and local development.
#[derive(Debug, Clone)]
pub struct StaticIdentityVerifier {
    token: String,
    principal: Principal,
}

impl StaticIdentityVerifier {
    /// Accepts exactly one token and maps it to one principal.
    pub fn new(token: impl Into<String>, principal: Principal) -> Self {
        Self {
            token: token.into(),
            principal,
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        if token == self.token {
            Ok(self.principal.clone())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Extractor that authenticates the request before the handler runs.
#[derive(Debug)]
pub struct AuthUser(pub Principal);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl<S, C, V> FromRequestParts<Arc<AppState<S, C, V>>> for AuthUser
where
    S: CartStore + 'static,
    C: CatalogReader + 'static,
    V: IdentityVerifier + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S, C, V>>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or(ApiError::Unauthorized(AuthError::MissingToken))?;
        let principal = state
            .identity
            .verify(token)
            .await
            .map_err(ApiError::Unauthorized)?;
        Ok(AuthUser(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            user_id: UserId::new("u1"),
            role: "customer".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn principal_deserializes_the_identity_service_shape() {
        let json = r#"{"userId":"u1","role":"customer","firstName":"Ada","lastName":"Lovelace"}"#;
        let parsed: Principal = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.user_id, UserId::new("u1"));
        assert_eq!(parsed.role, "customer");
    }

    #[tokio::test]
    async fn static_verifier_accepts_only_its_token() {
        let verifier = StaticIdentityVerifier::new("good", principal());

        assert!(verifier.verify("good").await.is_ok());
        let err = verifier.verify("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
