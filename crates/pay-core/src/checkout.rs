//! # Checkout Types
//!
//! Request and response shapes for the checkout API: sessions, payment
//! methods, payments and payment details. Field names follow the gateway's
//! camelCase wire format; unknown fields are carried through untouched so
//! the client-side component receives everything the gateway returned.

use crate::order::{Amount, LineItem};
use crate::result_code::{Outcome, ResultCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Channel sent with every request originating from this service
pub const CHANNEL_WEB: &str = "Web";

/// Create a checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub merchant_account: String,
    pub reference: String,
    pub amount: Amount,
    /// Where the shopper returns after a redirect (3DS2, local methods)
    pub return_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(rename = "shopperIP", skip_serializing_if = "Option::is_none")]
    pub shopper_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
}

/// Session created by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// List the payment methods available to the merchant account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsRequest {
    pub merchant_account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_locale: Option<String>,
}

/// A single payment method offered to the shopper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentMethodsResponse {
    pub fn method_types(&self) -> impl Iterator<Item = &str> {
        self.payment_methods.iter().map(|m| m.method_type.as_str())
    }
}

/// Submit a payment.
///
/// The client-side component posts its state (`paymentMethod`,
/// `browserInfo`, `billingAddress`, ...); the server fills in merchant
/// account, amount, reference and return URL before forwarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub payment_method: Value,
    #[serde(default)]
    pub merchant_account: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(rename = "shopperIP", default, skip_serializing_if = "Option::is_none")]
    pub shopper_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopper_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopper_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub additional_data: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentRequest {
    /// `paymentMethod.type`, e.g. `scheme`, `ideal`, `klarna`
    pub fn payment_method_type(&self) -> Option<&str> {
        self.payment_method.get("type").and_then(Value::as_str)
    }
}

/// Follow-up the client component must perform (redirect, 3DS2 challenge)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAction {
    #[serde(rename = "type")]
    pub action_type: String,
    /// Opaque continuation token needed to resume after the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of both `/payments` and `/payments/details`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_code: Option<ResultCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psp_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal_reason_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PaymentAction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentResponse {
    /// Continuation token carried by the action, if any
    pub fn payment_data(&self) -> Option<&str> {
        self.action
            .as_ref()
            .and_then(|a| a.payment_data.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Page the shopper should land on for this response
    pub fn outcome(&self) -> Outcome {
        let code = self
            .result_code
            .clone()
            .unwrap_or_else(|| ResultCode::Other("Unknown".to_string()));
        Outcome::from_result(&code, self.refusal_reason.as_deref())
    }
}

/// Details collected after a redirect or an additional action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCompletionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(rename = "MD", default, skip_serializing_if = "Option::is_none")]
    pub md: Option<String>,
    #[serde(rename = "PaRes", default, skip_serializing_if = "Option::is_none")]
    pub pa_res: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentCompletionDetails {
    pub fn is_empty(&self) -> bool {
        self.redirect_result.is_none()
            && self.payload.is_none()
            && self.md.is_none()
            && self.pa_res.is_none()
            && self.extra.is_empty()
    }
}

/// Submit additional details (`/payments/details`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsRequest {
    #[serde(default)]
    pub details: PaymentCompletionDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
}
