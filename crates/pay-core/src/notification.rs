//! # Notification Types
//!
//! Webhook notifications posted by the payment processor.
//!
//! ```text
//! { "live": "false",
//!   "notificationItems": [ { "NotificationRequestItem": { ... } } ] }
//! ```

use crate::order::Amount;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key of the signature inside `additionalData`
pub const HMAC_SIGNATURE_KEY: &str = "hmacSignature";

/// Envelope of a webhook delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(default)]
    pub live: String,
    #[serde(default)]
    pub notification_items: Vec<NotificationItemContainer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItemContainer {
    #[serde(rename = "NotificationRequestItem")]
    pub item: NotificationItem,
}

impl NotificationRequest {
    pub fn is_live(&self) -> bool {
        self.live == "true"
    }

    pub fn items(&self) -> impl Iterator<Item = &NotificationItem> {
        self.notification_items.iter().map(|c| &c.item)
    }

    pub fn into_items(self) -> Vec<NotificationItem> {
        self.notification_items.into_iter().map(|c| c.item).collect()
    }
}

/// Event code of a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCode {
    Authorisation,
    Cancellation,
    Refund,
    CancelOrRefund,
    Capture,
    CaptureFailed,
    RefundFailed,
    Chargeback,
    Pending,
    /// Any other event (passthrough)
    Other(String),
}

impl EventCode {
    pub fn as_str(&self) -> &str {
        match self {
            EventCode::Authorisation => "AUTHORISATION",
            EventCode::Cancellation => "CANCELLATION",
            EventCode::Refund => "REFUND",
            EventCode::CancelOrRefund => "CANCEL_OR_REFUND",
            EventCode::Capture => "CAPTURE",
            EventCode::CaptureFailed => "CAPTURE_FAILED",
            EventCode::RefundFailed => "REFUND_FAILED",
            EventCode::Chargeback => "CHARGEBACK",
            EventCode::Pending => "PENDING",
            EventCode::Other(code) => code,
        }
    }
}

impl From<String> for EventCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "AUTHORISATION" => EventCode::Authorisation,
            "CANCELLATION" => EventCode::Cancellation,
            "REFUND" => EventCode::Refund,
            "CANCEL_OR_REFUND" => EventCode::CancelOrRefund,
            "CAPTURE" => EventCode::Capture,
            "CAPTURE_FAILED" => EventCode::CaptureFailed,
            "REFUND_FAILED" => EventCode::RefundFailed,
            "CHARGEBACK" => EventCode::Chargeback,
            "PENDING" => EventCode::Pending,
            _ => EventCode::Other(code),
        }
    }
}

impl From<EventCode> for String {
    fn from(code: EventCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event record delivered by the processor.
///
/// Identity is the processor-assigned `pspReference`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    #[serde(default)]
    pub additional_data: HashMap<String, String>,
    pub amount: Amount,
    pub event_code: EventCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    pub merchant_account_code: String,
    #[serde(default)]
    pub merchant_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub psp_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// `"true"` or `"false"`, kept as sent since it is part of the signature
    pub success: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<String>,
}

impl NotificationItem {
    pub fn is_success(&self) -> bool {
        self.success == "true"
    }

    pub fn hmac_signature(&self) -> Option<&str> {
        self.additional_data
            .get(HMAC_SIGNATURE_KEY)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Fields covered by the signature, in signing order
    pub fn signing_payload(&self) -> String {
        [
            self.psp_reference.as_str(),
            self.original_reference.as_deref().unwrap_or(""),
            self.merchant_account_code.as_str(),
            self.merchant_reference.as_str(),
            &self.amount.value.to_string(),
            self.amount.currency.as_str(),
            self.event_code.as_str(),
            self.success.as_str(),
        ]
        .join(":")
    }

    pub fn event_time(&self) -> Option<DateTime<FixedOffset>> {
        self.event_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
    }
}
