//! # Adyen HTTP Client
//!
//! Shared HTTP plumbing for every Adyen API: authentication, idempotency
//! keys and error decoding.

use crate::checkout::AdyenCheckout;
use crate::config::AdyenConfig;
use crate::platform::AdyenPlatform;
use pay_core::{PaymentError, PaymentResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

pub(crate) const PROVIDER: &str = "adyen";

/// Entry point to the Adyen APIs.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct AdyenClient {
    http: Client,
    config: Arc<AdyenConfig>,
}

impl AdyenClient {
    pub fn new(config: AdyenConfig) -> PaymentResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(AdyenConfig::from_env()?)
    }

    pub fn config(&self) -> &AdyenConfig {
        &self.config
    }

    /// Checkout API (sessions, payment methods, payments)
    pub fn checkout(&self) -> AdyenCheckout {
        AdyenCheckout::new(self.clone())
    }

    /// Balance platform and legal entity APIs
    pub fn platform(&self) -> AdyenPlatform {
        AdyenPlatform::new(self.clone())
    }

    /// POST a JSON body and decode the JSON answer
    pub(crate) async fn post<Req, Res>(
        &self,
        url: &str,
        api_key: &str,
        body: &Req,
        idempotency_key: Option<&str>,
    ) -> PaymentResult<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        debug!("POST {}", url);

        let mut request = self
            .http
            .post(url)
            .header("X-API-Key", api_key)
            .json(body);

        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Adyen API error: status={}, body={}", status, text);
            return Err(decode_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Adyen response: {}", e))
        })
    }
}

/// Checkout errors use `message`; platform APIs use problem details
/// (`title`/`detail`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdyenErrorResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

fn decode_error(status: u16, body: &str) -> PaymentError {
    match serde_json::from_str::<AdyenErrorResponse>(body) {
        Ok(err) => {
            let message = err
                .message
                .or(err.detail)
                .or(err.title)
                .unwrap_or_else(|| format!("HTTP {}", status));
            PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                status,
                error_code: err.error_code,
                message,
            }
        }
        Err(_) => PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            status,
            error_code: None,
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
