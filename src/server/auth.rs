//! Bearer-token authentication for the gateway.
//!
//! Gated routes require an `Authorization: Bearer <token>` header. The token
//! is resolved against the external identity provider on every request; on
//! success the resolved [`Principal`] is attached to the request extensions
//! for downstream handlers.
//!
//! The gate is pure: it has no side effects beyond attaching the principal.
//! Verification failures map to 401; an unexpected provider failure
//! (network, malformed response) maps to 500 and never crashes the process.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use imagegen_gateway::server::auth::bearer_auth_middleware;
//!
//! let router = Router::new()
//!     .route("/protected/profile", get(profile_handler))
//!     .layer(middleware::from_fn_with_state(identity, bearer_auth_middleware::<I>));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

use crate::error::IdentityError;
use crate::identity::IdentityProvider;

use super::handlers::ErrorBody;

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No `Authorization` header was present
    MissingToken,

    /// The `Authorization` header was not a bearer credential
    MalformedHeader,

    /// The identity provider did not recognize the token
    TokenRejected,

    /// The identity provider could not be consulted
    Upstream(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken | AuthError::MalformedHeader => {
                write!(f, "Missing or malformed access token")
            }
            AuthError::TokenRejected => write!(f, "Invalid or expired token"),
            AuthError::Upstream(_) => write!(f, "Token verification failed"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        // Rejected tokens are routine; an unreachable provider is not
        match &self {
            AuthError::Upstream(detail) => {
                error!(
                    status = status.as_u16(),
                    "Token verification failed: {}", detail
                );
            }
            AuthError::TokenRejected => {
                debug!(status = status.as_u16(), "Rejected access token");
            }
            _ => {
                debug!(status = status.as_u16(), "Missing or malformed access token");
            }
        }

        let body = ErrorBody::new(self.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            // Anything the provider itself reported counts as a rejected
            // credential; only failures to consult the provider are internal.
            IdentityError::TokenRejected | IdentityError::Provider { .. } => {
                AuthError::TokenRejected
            }
            IdentityError::Connection(detail) | IdentityError::MalformedResponse(detail) => {
                AuthError::Upstream(detail)
            }
        }
    }
}

// =============================================================================
// Token Extraction
// =============================================================================

/// Extract the bearer token from the `Authorization` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware for bearer-token verification.
///
/// Extracts the token from the `Authorization` header, resolves it against
/// the identity provider, and inserts the resulting [`crate::identity::Principal`]
/// into the request extensions. Requests without a valid token are rejected
/// before any downstream work happens.
pub async fn bearer_auth_middleware<I>(
    State(identity): State<Arc<I>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    I: IdentityProvider + 'static,
{
    let token = extract_bearer_token(request.headers())?.to_string();

    let principal = identity.resolve_token(&token).await.map_err(|err| {
        if matches!(err, IdentityError::Connection(_) | IdentityError::MalformedResponse(_)) {
            warn!("Identity provider unavailable during verification: {}", err);
        }
        AuthError::from(err)
    })?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
