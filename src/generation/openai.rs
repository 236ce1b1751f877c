//! OpenAI Images API client.
//!
//! Issues a single `POST /v1/images/generations` per request with a fixed
//! model identifier and `n: 1`, then extracts the one produced image's
//! reference field. There is no retry or backoff; the only bound on an
//! outbound call is the client timeout configured at construction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::GenerationError;

use super::{ImageGenerator, ImageRef, ImageSize, ResponseMode};

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Image-generation client backed by the OpenAI Images API.
pub struct OpenAiImageClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    response_mode: ResponseMode,
}

impl OpenAiImageClient {
    /// Create a new client against the default OpenAI endpoint.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        response_mode: ResponseMode,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: model.into(),
            response_mode,
        })
    }

    /// Override the provider endpoint (for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImageRef, GenerationError> {
        let request = GenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: size.as_str(),
            response_format: self.response_mode.as_provider_format(),
        };

        debug!(model = %self.model, size = %size, "Requesting image generation");

        let url = format!("{}/v1/images/generations", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach image provider: {}", e);
                GenerationError::Connection(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Image provider error: {}", body);
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;
        let parsed: GenerationResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse image provider response: {}", e);
            GenerationError::MalformedResponse(e.to_string())
        })?;

        let image = parsed.data.first().ok_or(GenerationError::MissingImage)?;

        let image_ref = match self.response_mode {
            ResponseMode::Url => image.url.clone(),
            ResponseMode::Base64 => image.b64_json.clone(),
        }
        .ok_or(GenerationError::MissingImage)?;

        Ok(ImageRef(image_ref))
    }
}

// =============================================================================
// Tests
// =============================================================================
