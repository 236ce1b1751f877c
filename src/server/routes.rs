//! Router configuration for the image generation gateway.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /                     - Landing page (public)
//! /health               - Health check (public)
//! /supabase-config      - Public identity-provider config (public)
//! /auth/signup          - Account signup (public)
//! /generate-image       - Image generation (gated when auth is enabled)
//! /protected/profile    - Caller's principal (always gated)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use imagegen_gateway::server::routes::{create_router, RouterConfig};
//!
//! let state = AppState::new(generator, identity, public_config);
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(state, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::generation::ImageGenerator;
use crate::identity::IdentityProvider;

use super::auth::bearer_auth_middleware;
use super::handlers::{
    generate_image_handler, health_handler, landing_handler, profile_handler, signup_handler,
    supabase_config_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Whether image generation requires a bearer token
    pub auth_enabled: bool,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - Authentication is enabled on image generation
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            auth_enabled: true,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Create a configuration with image generation left public.
    ///
    /// `/protected/profile` stays gated regardless.
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        Self {
            auth_enabled: false,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable authentication on image generation.
    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (landing, health, public config, signup)
/// - Gated routes (profile always; image generation when auth is enabled)
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<G, I>(state: AppState<G, I>, config: RouterConfig) -> Router
where
    G: ImageGenerator + 'static,
    I: IdentityProvider + 'static,
{
    let cors = build_cors_layer(&config);

    // The profile route proves the gate attached a principal, so it is gated
    // unconditionally; only image generation honors the auth toggle.
    let mut gated_routes = Router::new().route("/protected/profile", get(profile_handler));
    let mut public_routes = Router::new()
        .route("/", get(landing_handler))
        .route("/health", get(health_handler))
        .route("/supabase-config", get(supabase_config_handler::<G, I>))
        .route("/auth/signup", post(signup_handler::<G, I>));

    if config.auth_enabled {
        gated_routes = gated_routes.route("/generate-image", post(generate_image_handler::<G, I>));
    } else {
        public_routes = public_routes.route("/generate-image", post(generate_image_handler::<G, I>));
    }

    let gated_routes = gated_routes.layer(middleware::from_fn_with_state(
        state.identity.clone(),
        bearer_auth_middleware::<I>,
    ));

    let router = Router::new()
        .merge(gated_routes)
        .merge(public_routes)
        .with_state(state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
