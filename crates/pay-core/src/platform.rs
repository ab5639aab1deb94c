//! # Platform Types
//!
//! Balance platform (card issuing) and legal entity management types.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Card configuration profile set up for the balance platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfiguration {
    pub configuration_profile_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    /// `physical` or `virtual`
    pub form_factor: String,
    pub cardholder_name: String,
    /// Card scheme, e.g. `mc`, `visa`
    pub brand: String,
    /// e.g. `mcdebit`
    pub brand_variant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<CardConfiguration>,
}

/// Request to issue a payment instrument against a balance account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrumentInfo {
    pub balance_account_id: String,
    #[serde(rename = "type")]
    pub instrument_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardInfo>,
}

impl PaymentInstrumentInfo {
    /// A card instrument
    pub fn card(balance_account_id: impl Into<String>, card: CardInfo) -> Self {
        Self {
            balance_account_id: balance_account_id.into(),
            instrument_type: "card".to_string(),
            issuing_country_code: None,
            description: None,
            card: Some(card),
        }
    }

    pub fn validate(&self) -> PaymentResult<()> {
        if self.balance_account_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "balanceAccountId is required".to_string(),
            ));
        }
        if self.instrument_type == "card" && self.card.is_none() {
            return Err(PaymentError::InvalidRequest(
                "card details are required for type 'card'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payment instrument created by the balance platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    pub id: String,
    #[serde(default)]
    pub balance_account_id: String,
    #[serde(rename = "type", default)]
    pub instrument_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How a bank account is identified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccountIdentification {
    #[serde(rename = "iban")]
    Iban { iban: String },

    #[serde(rename = "usLocal")]
    UsLocal {
        #[serde(rename = "accountNumber")]
        account_number: String,
        #[serde(rename = "routingNumber")]
        routing_number: String,
    },

    #[serde(rename = "ukLocal")]
    UkLocal {
        #[serde(rename = "accountNumber")]
        account_number: String,
        #[serde(rename = "sortCode")]
        sort_code: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountInfo {
    pub account_identification: AccountIdentification,
}

/// Request to attach a transfer instrument to a legal entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInstrumentInfo {
    #[serde(rename = "type")]
    pub instrument_type: String,
    pub legal_entity_id: String,
    pub bank_account: BankAccountInfo,
}

impl TransferInstrumentInfo {
    /// A bank account identified by IBAN
    pub fn iban(legal_entity_id: impl Into<String>, iban: impl Into<String>) -> Self {
        Self {
            instrument_type: "bankAccount".to_string(),
            legal_entity_id: legal_entity_id.into(),
            bank_account: BankAccountInfo {
                account_identification: AccountIdentification::Iban { iban: iban.into() },
            },
        }
    }

    pub fn validate(&self) -> PaymentResult<()> {
        if self.legal_entity_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "legalEntityId is required".to_string(),
            ));
        }
        if let AccountIdentification::Iban { iban } = &self.bank_account.account_identification {
            if iban.trim().is_empty() {
                return Err(PaymentError::InvalidRequest("iban is required".to_string()));
            }
        }
        Ok(())
    }
}

/// Transfer instrument created by legal entity management
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInstrument {
    pub id: String,
    #[serde(default)]
    pub legal_entity_id: String,
    #[serde(rename = "type", default)]
    pub instrument_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
