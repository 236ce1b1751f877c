//! # Image Generation Gateway
//!
//! An authenticated HTTP gateway in front of an external image-generation
//! provider. Clients POST a text prompt; the gateway validates it, forwards
//! it to the provider, and returns the produced image reference. Request
//! authentication and account signup are delegated to an external identity
//! provider; the gateway itself owns no persistent state.
//!
//! ## Features
//!
//! - **Prompt-to-image**: Single-call image generation with a closed set of
//!   sizes and silent fallback to the default size
//! - **Bearer-token gate**: Per-request token verification against the
//!   identity provider, with the resolved principal attached to the request
//! - **Admin provisioning**: Signup with pre-confirmed email via the
//!   identity provider's administrative API
//! - **Public config endpoint**: Serves only the non-secret identity
//!   parameters, with no-store cache headers
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`generation`] - Image-generation trait and OpenAI client
//! - [`identity`] - Principal, identity trait, and Supabase client
//! - [`server`] - Axum-based HTTP server, auth middleware, and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Provider error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use imagegen_gateway::generation::{OpenAiImageClient, ResponseMode};
//! use imagegen_gateway::identity::SupabaseIdentity;
//! use imagegen_gateway::server::{create_router, AppState, PublicIdentityConfig, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = OpenAiImageClient::new(
//!         "sk-...",
//!         "dall-e-3",
//!         ResponseMode::Url,
//!         Duration::from_secs(60),
//!     )
//!     .unwrap();
//!     let identity = SupabaseIdentity::new(
//!         "https://project.supabase.co",
//!         "anon-key",
//!         "service-role-key",
//!         Duration::from_secs(60),
//!     )
//!     .unwrap();
//!
//!     let state = AppState::new(
//!         generator,
//!         identity,
//!         PublicIdentityConfig {
//!             url: "https://project.supabase.co".to_string(),
//!             anon_key: "anon-key".to_string(),
//!         },
//!     );
//!     let router = create_router(state, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod identity;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{GenerationError, IdentityError};
pub use generation::{
    ImageGenerator, ImageRef, ImageSize, OpenAiImageClient, ResponseMode, DEFAULT_OPENAI_BASE_URL,
};
pub use identity::{IdentityProvider, Principal, ProvisionRequest, SupabaseIdentity};
pub use server::{
    bearer_auth_middleware, create_router, AppState, AuthError, ErrorBody, GenerateImageRequest,
    GenerateImageResponse, HealthResponse, PrincipalResponse, PublicIdentityConfig, RouterConfig,
    SignupRequest,
};
