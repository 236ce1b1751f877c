//! HTTP server layer for the image generation gateway.
//!
//! This module provides the HTTP API that fronts the external providers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │   POST /generate-image   POST /auth/signup   GET /protected/…   │
//! │                                                                 │
//! │  ┌─────────────┐  ┌──────────────┐  ┌───────────────────────┐   │
//! │  │  handlers   │  │     auth     │  │        routes         │   │
//! │  │ (requests)  │  │ (bearer gate)│  │   (router config)     │   │
//! │  └─────────────┘  └──────────────┘  └───────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{bearer_auth_middleware, extract_bearer_token, AuthError};
pub use handlers::{
    generate_image_handler, health_handler, landing_handler, profile_handler, signup_handler,
    supabase_config_handler, AppState, ErrorBody, GenerateError, GenerateImageRequest,
    GenerateImageResponse, HealthResponse, PrincipalResponse, PublicIdentityConfig, SignupError,
    SignupRequest,
};
pub use routes::{create_router, RouterConfig};
