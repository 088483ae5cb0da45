//! Request authentication extractors.

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use jobportal_core::auth::{bearer_token, verify_token};
use jobportal_core::{Identity, PortalError};
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared secret for `/internal/*` routes.
pub const INTERNAL_TOKEN_HEADER: &str = "x-internal-token";

/// The caller's identity, taken from `Authorization: Bearer <token>` or,
/// for WebSocket upgrades, the `token` query parameter.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)
            .ok_or_else(|| ApiError(PortalError::unauthenticated("missing bearer token")))?;
        let identity = verify_token(&state.config.jwt_secret, &token)?;
        Ok(AuthUser(identity))
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        return bearer_token(value).map(str::to_string);
    }
    let Query(query) = Query::<TokenQuery>::try_from_uri(&parts.uri).ok()?;
    query.token.filter(|t| !t.is_empty())
}

/// Guard for routes called by other portal services.
#[derive(Debug, Clone, Copy)]
pub struct InternalCaller;

impl FromRequestParts<AppState> for InternalCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.internal_token.as_deref() else {
            return Ok(InternalCaller);
        };
        let supplied = parts
            .headers
            .get(INTERNAL_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok());
        if supplied == Some(expected) {
            Ok(InternalCaller)
        } else {
            warn!("Rejected internal call with missing or wrong token");
            Err(ApiError(PortalError::unauthenticated("internal token mismatch")))
        }
    }
}
