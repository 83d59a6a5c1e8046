//! Authentication for protected routes.
//!
//! Identity is an external collaborator: tokens are issued elsewhere and
//! this layer only *verifies* them through the [`IdentityProvider`] trait.
//! Handlers opt into authentication by taking an [`AuthUser`] parameter:
//!
//! ```rust,ignore
//! async fn book_event(
//!     user: AuthUser,
//!     Path(id): Path<Uuid>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<EventResponse>, AppError> {
//!     // user.0 is a verified UserId
//! }
//! ```
//!
//! Verification failures surface as 401 responses; nothing below the HTTP
//! layer sees unauthenticated requests.

use crate::error::AppError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;
use stayplan_core::types::UserId;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by identity verification.
type VerifyFuture<'a> = Pin<Box<dyn Future<Output = Result<UserId, IdentityError>> + Send + 'a>>;

/// Errors from identity verification.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token was rejected
    #[error("invalid or expired token")]
    InvalidToken,

    /// The provider could not be reached
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// External identity provider interface.
///
/// Resolves a bearer token to the caller's user identifier. Token issuance,
/// sessions and user management all live in the external service.
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token and return the user it belongs to.
    fn verify(&self, token: &str) -> VerifyFuture<'_>;
}

/// Identity provider backed by a fixed token map.
///
/// Intended for development and tests: tokens and the users they map to
/// come from configuration, no network involved.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenIdentity {
    tokens: HashMap<String, String>,
}

impl StaticTokenIdentity {
    /// Create a provider from `(token, user_id)` pairs
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tokens: pairs.into_iter().collect(),
        }
    }

    /// Parse a `token=user,token2=user2` specification (config format)
    #[must_use]
    pub fn from_spec(spec: &str) -> Self {
        Self::new(spec.split(',').filter_map(|pair| {
            let (token, user) = pair.trim().split_once('=')?;
            if token.is_empty() || user.is_empty() {
                return None;
            }
            Some((token.to_string(), user.to_string()))
        }))
    }
}

impl IdentityProvider for StaticTokenIdentity {
    fn verify(&self, token: &str) -> VerifyFuture<'_> {
        let result = self
            .tokens
            .get(token)
            .map(UserId::new)
            .ok_or(IdentityError::InvalidToken);
        Box::pin(async move { result })
    }
}

/// Response shape of the remote verification endpoint.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: String,
}

/// Identity provider that verifies tokens against a remote endpoint.
///
/// Sends `GET <verify_url>` with the bearer token and expects a JSON body
/// containing `user_id` on success. Any non-success status is treated as
/// an invalid token; transport failures surface as `Unavailable`.
#[derive(Clone)]
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    verify_url: String,
}

impl RemoteIdentityProvider {
    /// Create a provider for the given verification endpoint
    #[must_use]
    pub fn new(verify_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url: verify_url.into(),
        }
    }
}

impl IdentityProvider for RemoteIdentityProvider {
    fn verify(&self, token: &str) -> VerifyFuture<'_> {
        let token = token.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&self.verify_url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

            if !response.status().is_success() {
                return Err(IdentityError::InvalidToken);
            }

            let body: VerifyResponse = response
                .json()
                .await
                .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
            Ok(UserId::new(body.user_id))
        })
    }
}

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .to_string();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// Authenticated caller.
///
/// Extracting this verifies the bearer token through the configured
/// identity provider; handlers taking `AuthUser` never run for anonymous
/// requests.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        match state.identity.verify(&bearer.0).await {
            Ok(user_id) => Ok(Self(user_id)),
            Err(IdentityError::InvalidToken) => {
                Err(AppError::unauthorized("Invalid or expired token"))
            }
            Err(err @ IdentityError::Unavailable(_)) => {
                Err(AppError::internal("Identity verification failed").with_source(err.into()))
            }
        }
    }
}
