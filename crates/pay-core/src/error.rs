//! # Payment Error Types
//!
//! Typed error handling for the checkout service.
//! All gateway operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid HMAC key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The gateway answered with a non-success status
    #[error("Provider error [{provider}] (status {status}): {message}")]
    ProviderError {
        provider: String,
        status: u16,
        error_code: Option<String>,
        message: String,
    },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Notification signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Notification payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Gateway failures keep the upstream status when it is a redirect or
    /// error status, everything else the gateway produced maps to 400.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::Internal(_) => 500,
            PaymentError::WebhookVerificationFailed(_) => 401,
            PaymentError::ProviderError { status, .. } if *status >= 300 => *status,
            PaymentError::ProviderError { .. } => 400,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::NetworkError(_) => 400,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::Serialization(_) => 400,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
