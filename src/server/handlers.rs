//! HTTP request handlers for the image generation gateway.
//!
//! # Endpoints
//!
//! - `GET /` - Landing page
//! - `GET /health` - Health check endpoint
//! - `POST /generate-image` - Generate an image from a prompt
//! - `POST /auth/signup` - Create an account via the identity provider
//! - `GET /supabase-config` - Public identity-provider parameters
//! - `GET /protected/profile` - Resolved principal of the caller

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{GenerationError, IdentityError};
use crate::generation::{ImageGenerator, ImageSize};
use crate::identity::{IdentityProvider, Principal, ProvisionRequest};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers.
///
/// Both provider clients are constructed once at startup and treated as
/// immutable configuration; no handler ever re-instantiates a client.
pub struct AppState<G: ImageGenerator, I: IdentityProvider> {
    /// Image-generation provider client
    pub generator: Arc<G>,

    /// Identity provider client (verification and provisioning)
    pub identity: Arc<I>,

    /// Public identity-provider parameters served to browsers
    pub public_config: PublicIdentityConfig,
}

impl<G: ImageGenerator, I: IdentityProvider> AppState<G, I> {
    /// Create a new application state.
    pub fn new(generator: G, identity: I, public_config: PublicIdentityConfig) -> Self {
        Self {
            generator: Arc::new(generator),
            identity: Arc::new(identity),
            public_config,
        }
    }
}

impl<G: ImageGenerator, I: IdentityProvider> Clone for AppState<G, I> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            identity: Arc::clone(&self.identity),
            public_config: self.public_config.clone(),
        }
    }
}

/// The two public, non-secret identity-provider parameters.
///
/// This struct deliberately has no field for the service-role key, so the
/// privileged credential cannot reach the config endpoint by construction.
#[derive(Debug, Clone, Serialize)]
pub struct PublicIdentityConfig {
    /// Identity provider base URL
    #[serde(rename = "URL")]
    pub url: String,

    /// Public (anonymous) key
    #[serde(rename = "ANON_KEY")]
    pub anon_key: String,
}

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /generate-image`.
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    /// Prompt describing the image to generate
    #[serde(rename = "customPrompt", default)]
    pub custom_prompt: Option<String>,

    /// Requested size; values outside the closed set fall back to the default
    #[serde(default)]
    pub image_size: Option<String>,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,

    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error body returned for all error conditions.
///
/// `success` is always false; `error` carries a human-readable message and
/// never a stack trace.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    /// Create a new error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Successful response from `POST /generate-image`.
#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub success: bool,

    /// Image reference: URL or base64 payload per deployment mode
    pub image: String,
}

/// Successful response carrying a principal (`/auth/signup`, `/protected/profile`).
#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub success: bool,
    pub user: Principal,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors from the generate-image handler.
#[derive(Debug)]
pub enum GenerateError {
    /// Client input failed validation
    Validation(&'static str),

    /// The image provider call failed
    Generation(GenerationError),
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GenerateError::Validation(message) => {
                warn!(status = 400u16, "Rejected generation request: {}", message);
                (StatusCode::BAD_REQUEST, (*message).to_string())
            }
            GenerateError::Generation(err) => {
                error!(status = 500u16, "Image generation failed: {}", err);
                // Provider details stay in the logs
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to generate".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<GenerationError> for GenerateError {
    fn from(err: GenerationError) -> Self {
        GenerateError::Generation(err)
    }
}

/// Errors from the signup handler.
#[derive(Debug)]
pub enum SignupError {
    /// Client input failed validation
    Validation(&'static str),

    /// The identity provider rejected or failed the provisioning call
    Identity(IdentityError),
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SignupError::Validation(message) => {
                warn!(status = 400u16, "Rejected signup request: {}", message);
                (StatusCode::BAD_REQUEST, (*message).to_string())
            }
            SignupError::Identity(err @ IdentityError::Provider { message, .. }) => {
                let status = StatusCode::from_u16(err.provisioning_status())
                    .unwrap_or(StatusCode::BAD_REQUEST);
                warn!(
                    status = status.as_u16(),
                    "Identity provider rejected signup: {}", message
                );
                (status, message.clone())
            }
            SignupError::Identity(err) => {
                error!(status = 500u16, "Signup failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error during signup".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<IdentityError> for SignupError {
    fn from(err: IdentityError) -> Self {
        SignupError::Identity(err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Minimal landing page served at the root.
const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Image Generation Gateway</title>
</head>
<body>
  <h1>Image Generation Gateway</h1>
  <p>POST a prompt to <code>/generate-image</code> with a bearer token to generate an image.</p>
</body>
</html>
"#;

/// Handle landing page requests.
///
/// # Endpoint
///
/// `GET /`
pub async fn landing_handler() -> Html<&'static str> {
    Html(LANDING_HTML)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle image generation requests.
///
/// # Endpoint
///
/// `POST /generate-image`
///
/// # Request Body
///
/// - `customPrompt`: Prompt text; must be non-empty after trimming
/// - `image_size`: Optional; one of `1024x1024`, `1024x768`, `768x1024`.
///   Anything else silently becomes `1024x1024`.
///
/// # Response
///
/// - `200 OK`: `{"success": true, "image": "<url or base64>"}`
/// - `400 Bad Request`: Missing or empty prompt
/// - `401 Unauthorized`: Missing or invalid bearer token (when gated)
/// - `500 Internal Server Error`: Provider failure
pub async fn generate_image_handler<G: ImageGenerator, I: IdentityProvider>(
    State(state): State<AppState<G, I>>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, GenerateError> {
    let prompt = request
        .custom_prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(GenerateError::Validation(
            "customPrompt is required. Please provide a description of the image you want to generate.",
        ))?;

    let size = ImageSize::parse_or_default(request.image_size.as_deref());

    info!(size = %size, "Generating image for prompt: {}", prompt);

    let image = state.generator.generate(prompt, size).await?;

    Ok(Json(GenerateImageResponse {
        success: true,
        image: image.into_inner(),
    }))
}

/// Handle account signup requests.
///
/// # Endpoint
///
/// `POST /auth/signup`
///
/// # Request Body
///
/// - `email`, `password`: Required
/// - `firstName`, `lastName`: Optional; stored as profile metadata
///
/// # Response
///
/// - `200 OK`: `{"success": true, "user": {"id", "email", "role"}}`
/// - `400 Bad Request`: Missing email or password
/// - Provider status (default 400): Identity provider rejected the account
/// - `500 Internal Server Error`: Provider unreachable
pub async fn signup_handler<G: ImageGenerator, I: IdentityProvider>(
    State(state): State<AppState<G, I>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<PrincipalResponse>, SignupError> {
    let email = request
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or(SignupError::Validation("Email and password required"))?;
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(SignupError::Validation("Email and password required"))?;

    let provision = ProvisionRequest::new(
        email,
        password,
        request.first_name.clone(),
        request.last_name.clone(),
    );

    let user = state.identity.provision_user(&provision).await?;

    info!(user_id = %user.id, "Provisioned account");

    Ok(Json(PrincipalResponse {
        success: true,
        user,
    }))
}

/// Handle public identity-provider config requests.
///
/// # Endpoint
///
/// `GET /supabase-config`
///
/// # Response
///
/// `200 OK` with JSON body containing only the public parameters:
/// ```json
/// {
///   "URL": "https://project.supabase.co",
///   "ANON_KEY": "public-anon-key"
/// }
/// ```
///
/// The response carries `Cache-Control: no-store` headers because the values
/// change across deployments and environments.
pub async fn supabase_config_handler<G: ImageGenerator, I: IdentityProvider>(
    State(state): State<AppState<G, I>>,
) -> Response {
    (
        [(
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, private",
        )],
        Json(state.public_config.clone()),
    )
        .into_response()
}

/// Handle profile requests for the authenticated caller.
///
/// # Endpoint
///
/// `GET /protected/profile`
///
/// Requires `Authorization: Bearer <token>`. The principal is attached by
/// the authentication middleware; reaching this handler without one is a
/// routing bug, not a client error.
///
/// # Response
///
/// - `200 OK`: `{"success": true, "user": {"id", "email", "role"}}`
/// - `401 Unauthorized`: Missing or invalid bearer token
pub async fn profile_handler(Extension(principal): Extension<Principal>) -> Json<PrincipalResponse> {
    Json(PrincipalResponse {
        success: true,
        user: principal,
    })
}

// =============================================================================
// Tests
// =============================================================================
