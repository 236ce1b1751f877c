//! Identity layer.
//!
//! This module provides a provider-agnostic interface to an external identity
//! service, covering the two operations the gateway needs:
//!
//! - **Token resolution**: turn a bearer token into a [`Principal`], used by
//!   the authentication middleware to gate requests.
//! - **Provisioning**: administrative creation of a new account with the
//!   email pre-confirmed, used by the signup endpoint to bypass the
//!   provider's self-service confirmation step.
//!
//! Provisioning requires the elevated service-role credential; token
//! resolution only needs the public anonymous key plus the caller's token.
//! Both credentials are fixed at construction and never mutated.

mod supabase;

pub use supabase::SupabaseIdentity;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

// =============================================================================
// Principal
// =============================================================================

/// The authenticated identity resolved from a credential.
///
/// Derived per request from a verified token and discarded when the request
/// completes; the gateway never caches principals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Provider-assigned user identifier
    pub id: String,

    /// Account email address
    #[serde(default)]
    pub email: String,

    /// Provider role (e.g. "authenticated")
    #[serde(default)]
    pub role: String,
}

// =============================================================================
// Provision Request
// =============================================================================

/// Input to administrative account creation.
///
/// Email and password are mandatory; name fields default to empty strings
/// and are stored as profile metadata on the created account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProvisionRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
        }
    }
}

// =============================================================================
// IdentityProvider Trait
// =============================================================================

/// Interface to an external identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an access token into the principal it belongs to.
    ///
    /// # Arguments
    /// * `token` - The opaque bearer token presented by the caller
    ///
    /// # Returns
    /// The resolved principal, or [`IdentityError::TokenRejected`] when the
    /// provider does not recognize the token.
    async fn resolve_token(&self, token: &str) -> Result<Principal, IdentityError>;

    /// Create a new account with the email pre-confirmed.
    ///
    /// Uses the privileged service-role credential; never reachable from
    /// untrusted callers except through the signup endpoint's validation.
    async fn provision_user(&self, request: &ProvisionRequest)
        -> Result<Principal, IdentityError>;
}

// =============================================================================
// Tests
// =============================================================================
