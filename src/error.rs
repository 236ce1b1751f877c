use thiserror::Error;

/// Errors from the image-generation provider.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Network or connection error while reaching the provider
    #[error("Connection error: {0}")]
    Connection(String),

    /// Provider returned a non-success status
    #[error("Provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    /// Provider response could not be parsed
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Provider response contained no image reference
    #[error("No image reference in provider response")]
    MissingImage,
}

/// Errors from the identity provider (token verification and provisioning).
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// Network or connection error while reaching the provider
    #[error("Connection error: {0}")]
    Connection(String),

    /// Provider rejected the presented access token
    #[error("Invalid or expired token")]
    TokenRejected,

    /// Provider rejected the request with a status and message
    #[error("Identity provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    /// Provider response could not be parsed
    #[error("Malformed identity provider response: {0}")]
    MalformedResponse(String),
}

impl IdentityError {
    /// Status to surface to the caller for a provisioning failure.
    ///
    /// Provider-reported statuses pass through when they are valid client or
    /// server errors; everything else defaults to 400. Connection and parse
    /// failures are server-side problems and map to 500.
    pub fn provisioning_status(&self) -> u16 {
        match self {
            IdentityError::Provider { status, .. } if (400..600).contains(status) => *status,
            IdentityError::Provider { .. } => 400,
            _ => 500,
        }
    }
}
