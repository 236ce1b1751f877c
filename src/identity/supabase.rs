//! Supabase GoTrue identity client.
//!
//! Two endpoints are used:
//!
//! - `GET /auth/v1/user` with the caller's bearer token resolves a principal.
//! - `POST /auth/v1/admin/users` with the service-role key creates an account
//!   with `email_confirm` forced true.
//!
//! The service-role key grants administrative access and must never leave
//! this process; only the anonymous key is ever served to clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::IdentityError;

use super::{IdentityProvider, Principal, ProvisionRequest};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct AdminCreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: UserMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct UserMetadata<'a> {
    first_name: &'a str,
    last_name: &'a str,
}

/// Error body shapes GoTrue uses across versions.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Identity client backed by a Supabase GoTrue deployment.
pub struct SupabaseIdentity {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl SupabaseIdentity {
    /// Create a new identity client.
    ///
    /// # Arguments
    /// * `base_url` - Project base URL (e.g. `https://xyz.supabase.co`)
    /// * `anon_key` - Public anonymous key, sent as `apikey` on verification
    /// * `service_role_key` - Privileged key used only for provisioning
    /// * `timeout` - Timeout applied to every outbound call
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
        })
    }

    /// Extract the provider's error message from a non-success response body.
    fn provider_error(status: StatusCode, body: &str) -> IdentityError {
        let message = serde_json::from_str::<ProviderErrorBody>(body)
            .ok()
            .and_then(ProviderErrorBody::into_message)
            .unwrap_or_else(|| body.to_string());

        IdentityError::Provider {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn resolve_token(&self, token: &str) -> Result<Principal, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach identity provider: {}", e);
                IdentityError::Connection(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("Identity provider rejected token");
            return Err(IdentityError::TokenRejected);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                "Identity provider error during token resolution: {}", body
            );
            return Err(Self::provider_error(status, &body));
        }

        let principal: Principal = response
            .json()
            .await
            .map_err(|e| IdentityError::MalformedResponse(e.to_string()))?;

        // An empty identifier means the provider returned a body without a
        // usable user; treat it the same as a rejected token.
        if principal.id.is_empty() {
            return Err(IdentityError::TokenRejected);
        }

        Ok(principal)
    }

    async fn provision_user(
        &self,
        request: &ProvisionRequest,
    ) -> Result<Principal, IdentityError> {
        let body = AdminCreateUserRequest {
            email: &request.email,
            password: &request.password,
            email_confirm: true,
            user_metadata: UserMetadata {
                first_name: &request.first_name,
                last_name: &request.last_name,
            },
        };

        let url = format!("{}/auth/v1/admin/users", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach identity provider: {}", e);
                IdentityError::Connection(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                "Identity provider rejected provisioning: {}", body
            );
            return Err(Self::provider_error(status, &body));
        }

        let principal: Principal = response
            .json()
            .await
            .map_err(|e| IdentityError::MalformedResponse(e.to_string()))?;

        Ok(principal)
    }
}

// =============================================================================
// Tests
// =============================================================================
