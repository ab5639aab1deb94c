//! # Result Codes
//!
//! Payment result codes returned by the gateway and the mapping from a
//! result code to the page the shopper is sent to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a payment as reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultCode {
    Authorised,
    Pending,
    Received,
    Refused,
    Cancelled,
    Error,
    RedirectShopper,
    IdentifyShopper,
    ChallengeShopper,
    PresentToShopper,
    AuthenticationFinished,
    AuthenticationNotRequired,
    /// Any code this service does not know about (passthrough)
    Other(String),
}

impl ResultCode {
    pub fn as_str(&self) -> &str {
        match self {
            ResultCode::Authorised => "Authorised",
            ResultCode::Pending => "Pending",
            ResultCode::Received => "Received",
            ResultCode::Refused => "Refused",
            ResultCode::Cancelled => "Cancelled",
            ResultCode::Error => "Error",
            ResultCode::RedirectShopper => "RedirectShopper",
            ResultCode::IdentifyShopper => "IdentifyShopper",
            ResultCode::ChallengeShopper => "ChallengeShopper",
            ResultCode::PresentToShopper => "PresentToShopper",
            ResultCode::AuthenticationFinished => "AuthenticationFinished",
            ResultCode::AuthenticationNotRequired => "AuthenticationNotRequired",
            ResultCode::Other(code) => code,
        }
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        match code {
            "Authorised" => ResultCode::Authorised,
            "Pending" => ResultCode::Pending,
            "Received" => ResultCode::Received,
            "Refused" => ResultCode::Refused,
            "Cancelled" => ResultCode::Cancelled,
            "Error" => ResultCode::Error,
            "RedirectShopper" => ResultCode::RedirectShopper,
            "IdentifyShopper" => ResultCode::IdentifyShopper,
            "ChallengeShopper" => ResultCode::ChallengeShopper,
            "PresentToShopper" => ResultCode::PresentToShopper,
            "AuthenticationFinished" => ResultCode::AuthenticationFinished,
            "AuthenticationNotRequired" => ResultCode::AuthenticationNotRequired,
            other => ResultCode::Other(other.to_string()),
        }
    }
}

impl From<String> for ResultCode {
    fn from(code: String) -> Self {
        ResultCode::from(code.as_str())
    }
}

impl From<ResultCode> for String {
    fn from(code: ResultCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four pages a shopper can land on after a redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Pending,
    Failed,
    /// Carries the refusal reason, or the raw result code when there is none
    Error { reason: String },
}

impl Outcome {
    /// Select the outcome for a result code.
    ///
    /// `Authorised` is a success, `Pending` and `Received` are pending,
    /// `Refused` is a failure; every other code is an error.
    pub fn from_result(code: &ResultCode, refusal_reason: Option<&str>) -> Self {
        match code {
            ResultCode::Authorised => Outcome::Success,
            ResultCode::Pending | ResultCode::Received => Outcome::Pending,
            ResultCode::Refused => Outcome::Failed,
            other => {
                let reason = refusal_reason
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| other.as_str());
                Outcome::Error {
                    reason: reason.to_string(),
                }
            }
        }
    }

    /// Path segment under `/result/`
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Pending => "pending",
            Outcome::Failed => "failed",
            Outcome::Error { .. } => "error",
        }
    }

    /// Local path the shopper is redirected to
    pub fn route(&self) -> String {
        match self {
            Outcome::Error { reason } => {
                format!("/result/error?reason={}", query_escape(reason))
            }
            other => format!("/result/{}", other.status()),
        }
    }
}

/// Escape a value for use in a query string (spaces become `+`)
pub fn query_escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
