//! Session tokens.
//!
//! Identities arrive as HS256 bearer tokens issued by the portal's login
//! service. `issue_token` exists for local runs and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PortalError, PortalResult};
use crate::identity::{Identity, Role};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

/// Sign a token for `identity` valid for `ttl`.
pub fn issue_token(secret: &str, identity: &Identity, ttl: Duration) -> PortalResult<String> {
    let claims = Claims {
        sub: identity.id.clone(),
        role: identity.role.as_str().to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| PortalError::unauthenticated(format!("cannot sign token: {}", e)))
}

/// Verify a token and return the identity it names.
pub fn verify_token(secret: &str, token: &str) -> PortalResult<Identity> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        debug!(error = %e, "Rejected session token");
        PortalError::unauthenticated("invalid or expired token")
    })?;

    Identity::new(data.claims.sub, Role::from_str(&data.claims.role))
}

/// Read the identity a token names without checking its signature.
///
/// Clients use this to pick the rooms to join. The server still verifies
/// the token on every request.
pub fn peek_identity(token: &str) -> PortalResult<Identity> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| PortalError::unauthenticated(format!("malformed token: {}", e)))?;

    Identity::new(data.claims.sub, Role::from_str(&data.claims.role))
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
