//! # Order Types
//!
//! Order references, amounts and the static order template used for checkout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Per-attempt order reference.
///
/// Sent to the gateway as the payment `reference` and echoed back on the
/// shopper redirect as `orderRef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(Uuid);

impl OrderReference {
    /// Generate a new random reference
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderReference {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OrderReference {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Monetary amount in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// ISO 4217 currency code
    pub currency: String,
    /// Value in minor units (10000 = 100.00 EUR)
    pub value: i64,
}

impl Amount {
    pub fn new(value: i64, currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }
}

/// A line item, required by some payment methods (Klarna)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub description: String,

    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Unit amount including tax, in minor units
    #[serde(alias = "amount_including_tax")]
    pub amount_including_tax: i64,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "amount_excluding_tax")]
    pub amount_excluding_tax: Option<i64>,

    /// Tax percentage in basis points (2100 = 21%)
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "tax_percentage")]
    pub tax_percentage: Option<i64>,
}

fn default_quantity() -> i64 {
    1
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount_including_tax: i64) -> Self {
        Self {
            id: None,
            description: description.into(),
            quantity: 1,
            amount_including_tax,
            amount_excluding_tax: None,
            tax_percentage: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn total(&self) -> i64 {
        self.amount_including_tax * self.quantity
    }
}

/// Static order sent with every checkout session.
///
/// Loaded from `config/checkout.toml` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTemplate {
    pub amount: Amount,

    /// ISO 3166 country code of the shopper
    #[serde(default = "default_country")]
    pub country_code: String,

    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

fn default_country() -> String {
    "NL".to_string()
}

impl OrderTemplate {
    /// Parse a template from TOML
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Sum of all line item totals
    pub fn line_items_total(&self) -> i64 {
        self.line_items.iter().map(LineItem::total).sum()
    }
}

impl Default for OrderTemplate {
    fn default() -> Self {
        Self {
            amount: Amount::new(10000, "EUR"),
            country_code: default_country(),
            line_items: vec![
                LineItem::new("Sunglasses", 5000).with_id("1"),
                LineItem::new("Headphones", 5000).with_id("2"),
            ],
        }
    }
}

/// Currency to charge for a given payment method type.
///
/// Local payment methods only settle in their own currency.
pub fn currency_for_payment_method(payment_method_type: &str) -> &'static str {
    match payment_method_type {
        "ach" => "USD",
        "wechatpayqr" | "alipay" => "CNY",
        "dotpay" => "PLN",
        "boletobancario" | "boletobancario_santander" => "BRL",
        _ => "EUR",
    }
}

/// Klarna methods need shopper locale, country and line items
pub fn is_klarna(payment_method_type: &str) -> bool {
    payment_method_type.starts_with("klarna")
}
