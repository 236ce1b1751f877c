//! Test utilities for integration tests.
//!
//! This module provides mock provider implementations with call tracking,
//! so tests can assert that validation and authentication failures never
//! reach a downstream provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;

use imagegen_gateway::error::{GenerationError, IdentityError};
use imagegen_gateway::generation::{ImageGenerator, ImageRef, ImageSize};
use imagegen_gateway::identity::{IdentityProvider, Principal, ProvisionRequest};
use imagegen_gateway::server::{create_router, AppState, PublicIdentityConfig, RouterConfig};

// =============================================================================
// Mock Image Generator with Request Tracking
// =============================================================================

/// A mock image generator that serves a pre-configured result and tracks
/// every generate call.
pub struct MockImageGenerator {
    result: Result<String, GenerationError>,
    call_count: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(String, ImageSize)>>>,
}

impl MockImageGenerator {
    /// A generator that always succeeds with a fixed image URL.
    pub fn new() -> Self {
        Self::with_image("https://images.example.com/generated.png")
    }

    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            result: Ok(image.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            result: Err(error),
            call_count: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The (prompt, size) pair of the most recent call.
    pub fn last_request(&self) -> Option<(String, ImageSize)> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Clone for MockImageGenerator {
    fn clone(&self) -> Self {
        Self {
            result: self.result.clone(),
            call_count: Arc::clone(&self.call_count),
            last_request: Arc::clone(&self.last_request),
        }
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImageRef, GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((prompt.to_string(), size));
        self.result.clone().map(ImageRef)
    }
}

// =============================================================================
// Mock Identity Provider
// =============================================================================

/// A mock identity provider with a fixed token table and provisioning result.
pub struct MockIdentityProvider {
    tokens: HashMap<String, Principal>,
    provision_result: Result<Principal, IdentityError>,
    resolve_count: Arc<AtomicUsize>,
    provision_count: Arc<AtomicUsize>,
    last_provision: Arc<Mutex<Option<ProvisionRequest>>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            provision_result: Ok(test_principal()),
            resolve_count: Arc::new(AtomicUsize::new(0)),
            provision_count: Arc::new(AtomicUsize::new(0)),
            last_provision: Arc::new(Mutex::new(None)),
        }
    }

    /// Register a token that resolves to the given principal.
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    pub fn with_provision_result(mut self, result: Result<Principal, IdentityError>) -> Self {
        self.provision_result = result;
        self
    }

    pub fn resolve_count(&self) -> usize {
        self.resolve_count.load(Ordering::SeqCst)
    }

    pub fn provision_count(&self) -> usize {
        self.provision_count.load(Ordering::SeqCst)
    }

    pub fn last_provision(&self) -> Option<ProvisionRequest> {
        self.last_provision.lock().unwrap().clone()
    }
}

impl Clone for MockIdentityProvider {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            provision_result: self.provision_result.clone(),
            resolve_count: Arc::clone(&self.resolve_count),
            provision_count: Arc::clone(&self.provision_count),
            last_provision: Arc::clone(&self.last_provision),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn resolve_token(&self, token: &str) -> Result<Principal, IdentityError> {
        self.resolve_count.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(token)
            .cloned()
            .ok_or(IdentityError::TokenRejected)
    }

    async fn provision_user(
        &self,
        request: &ProvisionRequest,
    ) -> Result<Principal, IdentityError> {
        self.provision_count.fetch_add(1, Ordering::SeqCst);
        *self.last_provision.lock().unwrap() = Some(request.clone());
        self.provision_result.clone()
    }
}

// =============================================================================
// Router and Request Helpers
// =============================================================================

/// A principal with stable test values.
pub fn test_principal() -> Principal {
    Principal {
        id: "user-123".to_string(),
        email: "fox@example.com".to_string(),
        role: "authenticated".to_string(),
    }
}

/// Public config with stable test values.
pub fn test_public_config() -> PublicIdentityConfig {
    PublicIdentityConfig {
        url: "https://project.supabase.co".to_string(),
        anon_key: "public-anon-key".to_string(),
    }
}

/// Build a router over the given mocks.
pub fn build_router(
    generator: MockImageGenerator,
    identity: MockIdentityProvider,
    config: RouterConfig,
) -> Router {
    let state = AppState::new(generator, identity, test_public_config());
    create_router(state, config.with_tracing(false))
}

/// Build a JSON POST request.
pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a JSON POST request with a bearer token.
pub fn json_post_with_token(uri: &str, body: serde_json::Value, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
