//! Configuration management for the image generation gateway.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables (conventional provider names, `GATEWAY_` prefix
//!   for server settings)
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use imagegen_gateway::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `GATEWAY_HOST` - Server bind address (default: 0.0.0.0)
//! - `GATEWAY_PORT` - Server port (default: 5000)
//! - `OPENAI_API_KEY` - API key for the image-generation provider (required)
//! - `OPENAI_BASE_URL` - Override the provider endpoint (for testing/proxies)
//! - `OPENAI_IMAGE_MODEL` - Model identifier (default: dall-e-3)
//! - `GATEWAY_IMAGE_RESPONSE_FORMAT` - `url` or `b64_json` (default: url)
//! - `SUPABASE_URL` - Identity provider base URL (required)
//! - `SUPABASE_ANON_KEY` - Public (anonymous) identity provider key (required)
//! - `SUPABASE_SERVICE_ROLE_KEY` - Privileged key for provisioning (required)
//! - `GATEWAY_AUTH_ENABLED` - Require a bearer token on /generate-image (default: true)
//! - `GATEWAY_REQUEST_TIMEOUT` - Outbound HTTP timeout in seconds (default: 60)
//! - `GATEWAY_CORS_ORIGINS` - Allowed CORS origins (comma-separated)

use clap::Parser;

use crate::generation::ResponseMode;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default image-generation model identifier.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Default outbound request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Generation Gateway.
///
/// Accepts text prompts over HTTP, forwards them to an external
/// image-generation provider, and returns the resulting image reference.
/// Token verification and account signup are delegated to an external
/// identity provider.
#[derive(Parser, Debug, Clone)]
#[command(name = "imagegen-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "GATEWAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "GATEWAY_PORT")]
    pub port: u16,

    // =========================================================================
    // Image Provider Configuration
    // =========================================================================
    /// API key for the image-generation provider.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Override the image-generation provider endpoint.
    ///
    /// If not specified, uses the default OpenAI API endpoint.
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Model identifier sent with every generation request.
    #[arg(long, default_value = DEFAULT_IMAGE_MODEL, env = "OPENAI_IMAGE_MODEL")]
    pub image_model: String,

    /// How generated images are returned: `url` or `b64_json`.
    ///
    /// The mode is fixed per deployment; clients always receive the same
    /// representation in the `image` field.
    #[arg(long, default_value_t = ResponseMode::Url, env = "GATEWAY_IMAGE_RESPONSE_FORMAT")]
    pub image_response_format: ResponseMode,

    // =========================================================================
    // Identity Provider Configuration
    // =========================================================================
    /// Identity provider base URL (e.g. https://xyz.supabase.co).
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    /// Public (anonymous) identity provider key, safe to expose to browsers.
    #[arg(long, env = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: String,

    /// Privileged service-role key used for account provisioning.
    ///
    /// This key must never appear in any response body.
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_service_role_key: String,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Require a valid bearer token on /generate-image.
    ///
    /// When disabled, image generation is publicly accessible.
    /// WARNING: Only disable authentication in development/testing.
    #[arg(long, default_value_t = true, env = "GATEWAY_AUTH_ENABLED")]
    pub auth_enabled: bool,

    // =========================================================================
    // HTTP Client Configuration
    // =========================================================================
    /// Timeout in seconds for outbound provider calls.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, env = "GATEWAY_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "GATEWAY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.openai_api_key.trim().is_empty() {
            return Err(
                "Image provider API key is required. Set --openai-api-key or OPENAI_API_KEY"
                    .to_string(),
            );
        }

        let supabase_url = self.supabase_url_sanitized();
        if supabase_url.is_empty() {
            return Err(
                "Identity provider URL is required. Set --supabase-url or SUPABASE_URL".to_string(),
            );
        }
        if url::Url::parse(&supabase_url).is_err() {
            return Err(format!(
                "Identity provider URL is not a valid URL: {}",
                supabase_url
            ));
        }

        if self.supabase_anon_key_sanitized().is_empty() {
            return Err(
                "Identity provider anon key is required. Set --supabase-anon-key or SUPABASE_ANON_KEY"
                    .to_string(),
            );
        }

        if self.supabase_service_role_key.trim().is_empty() {
            return Err(
                "Identity provider service-role key is required. \
                 Set --supabase-service-role-key or SUPABASE_SERVICE_ROLE_KEY"
                    .to_string(),
            );
        }

        if let Some(ref base_url) = self.openai_base_url {
            if url::Url::parse(base_url).is_err() {
                return Err(format!(
                    "Image provider base URL is not a valid URL: {}",
                    base_url
                ));
            }
        }

        if self.request_timeout == 0 {
            return Err("request_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Identity provider URL with accidental quoting and whitespace removed.
    pub fn supabase_url_sanitized(&self) -> String {
        sanitize(&self.supabase_url)
    }

    /// Anonymous key with accidental quoting and whitespace removed.
    pub fn supabase_anon_key_sanitized(&self) -> String {
        sanitize(&self.supabase_anon_key)
    }
}

/// Strip surrounding whitespace and a single layer of accidental quoting.
///
/// Values pasted into env files often arrive wrapped in quotes; the quotes
/// would otherwise end up inside request headers and URLs.
pub fn sanitize(value: &str) -> String {
    let trimmed = value.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);
    unquoted.to_string()
}

// =============================================================================
// Tests
// =============================================================================
