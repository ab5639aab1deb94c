//! # pay-adyen
//!
//! Adyen gateway for adyen-checkout-rs.
//!
//! This crate provides:
//!
//! 1. **AdyenCheckout** - Checkout API
//!    - Sessions for the drop-in
//!    - Payment methods, payments and payment details
//!
//! 2. **AdyenPlatform** - Balance platform & legal entity management
//!    - Card issuing (payment instruments)
//!    - Transfer instruments (bank accounts)
//!
//! 3. **Webhooks** - Notification parsing, HMAC verification and dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_adyen::AdyenClient;
//! use pay_core::CheckoutGateway;
//!
//! let client = AdyenClient::from_env()?;
//! let methods = client.checkout().payment_methods(&request).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_adyen::{dispatch_notification, verify_notification, HmacValidator, LoggingNotificationHandler};
//!
//! let validator = HmacValidator::new(&config.hmac_key)?;
//! for item in verify_notification(&validator, &body)?.into_items() {
//!     dispatch_notification(&LoggingNotificationHandler, &item)?;
//! }
//! ```

pub mod checkout;
pub mod client;
pub mod config;
pub mod platform;
pub mod signature;
pub mod webhook;

// Re-exports
pub use checkout::AdyenCheckout;
pub use client::AdyenClient;
pub use config::{AdyenConfig, Environment};
pub use platform::AdyenPlatform;
pub use signature::HmacValidator;
pub use webhook::{
    dispatch_notification, parse_notification, verify_notification,
    LoggingNotificationHandler, NotificationHandler,
};
