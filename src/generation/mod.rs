//! Image generation layer.
//!
//! This module provides a provider-agnostic interface for turning a text
//! prompt into a generated image reference, plus the OpenAI Images API
//! implementation used in production.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Request Handlers             │
//! │    (validate prompt, normalize size)    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          ImageGenerator Trait           │
//! │   generate(prompt, size) -> ImageRef    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           OpenAiImageClient             │
//! │      POST /v1/images/generations        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Input validation is the caller's responsibility: the generator trusts
//! that the prompt is non-empty and the size comes from the closed enum.

mod openai;

pub use openai::{OpenAiImageClient, DEFAULT_OPENAI_BASE_URL};

use async_trait::async_trait;

use crate::error::GenerationError;

// =============================================================================
// Image Size
// =============================================================================

/// The closed set of image sizes the provider accepts.
///
/// Unknown values silently fall back to the default rather than erroring,
/// so a request always carries exactly one of these literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// 1024x1024 (default)
    #[default]
    Square,
    /// 1024x768
    Landscape,
    /// 768x1024
    Portrait,
}

impl ImageSize {
    /// The literal sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Landscape => "1024x768",
            ImageSize::Portrait => "768x1024",
        }
    }

    /// Parse a requested size, substituting the default for anything outside
    /// the closed set (including a missing value).
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("1024x1024") => ImageSize::Square,
            Some("1024x768") => ImageSize::Landscape,
            Some("768x1024") => ImageSize::Portrait,
            _ => ImageSize::default(),
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Response Mode
// =============================================================================

/// How generated images are returned to clients.
///
/// The mode is fixed per deployment; the two representations are never mixed
/// within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// The provider returns a remote URL for the generated image.
    #[default]
    Url,
    /// The provider returns the image inline as a base64 payload.
    Base64,
}

impl ResponseMode {
    /// The `response_format` value sent to the provider.
    pub fn as_provider_format(&self) -> &'static str {
        match self {
            ResponseMode::Url => "url",
            ResponseMode::Base64 => "b64_json",
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_provider_format())
    }
}

impl std::str::FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(ResponseMode::Url),
            "b64_json" => Ok(ResponseMode::Base64),
            other => Err(format!(
                "Invalid image response format: {} (expected 'url' or 'b64_json')",
                other
            )),
        }
    }
}

// =============================================================================
// Image Reference
// =============================================================================

/// A reference to a generated image.
///
/// Either a remote URL or a base64 payload, depending on the deployment's
/// [`ResponseMode`]. Exactly one representation is produced per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// =============================================================================
// ImageGenerator Trait
// =============================================================================

/// Interface to an image-generation provider.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for an already-validated prompt and size.
    ///
    /// # Arguments
    /// * `prompt` - Trimmed, non-empty prompt text
    /// * `size` - One of the closed set of supported sizes
    ///
    /// # Returns
    /// The reference to the single generated image.
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImageRef, GenerationError>;
}

// =============================================================================
// Tests
// =============================================================================
