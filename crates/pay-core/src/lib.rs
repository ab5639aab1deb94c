//! # pay-core
//!
//! Core types and traits for the adyen-checkout-rs service.
//!
//! This crate provides:
//! - `CheckoutGateway` and `PlatformGateway` traits for payment processors
//! - Checkout request/response types (sessions, payment methods, payments)
//! - `ResultCode` and `Outcome` for routing shoppers after a redirect
//! - `NotificationRequest` and `NotificationItem` for webhooks
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Outcome, ResultCode};
//!
//! let outcome = Outcome::from_result(&ResultCode::Refused, Some("Not enough balance"));
//! assert_eq!(outcome.route(), "/result/failed");
//! ```

pub mod checkout;
pub mod error;
pub mod gateway;
pub mod notification;
pub mod order;
pub mod platform;
pub mod result_code;

// Re-exports for convenience
pub use checkout::{
    CheckoutSessionResponse, CreateCheckoutSessionRequest, PaymentAction,
    PaymentCompletionDetails, PaymentDetailsRequest, PaymentMethod, PaymentMethodsRequest,
    PaymentMethodsResponse, PaymentRequest, PaymentResponse, CHANNEL_WEB,
};
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedCheckoutGateway, BoxedPlatformGateway, CheckoutGateway, PlatformGateway};
pub use notification::{EventCode, NotificationItem, NotificationRequest, HMAC_SIGNATURE_KEY};
pub use order::{
    currency_for_payment_method, is_klarna, Amount, LineItem, OrderReference, OrderTemplate,
};
pub use platform::{
    AccountIdentification, BankAccountInfo, CardConfiguration, CardInfo, PaymentInstrument,
    PaymentInstrumentInfo, TransferInstrument, TransferInstrumentInfo,
};
pub use result_code::{query_escape, Outcome, ResultCode};
