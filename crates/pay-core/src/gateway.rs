//! # Gateway Traits
//!
//! Seams between the HTTP layer and a payment processor.
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────────┐
//! │   CheckoutGateway (trait)    │   │     PlatformGateway (trait)      │
//! │  ├── create_session()        │   │  ├── create_payment_instrument() │
//! │  ├── payment_methods()       │   │  └── create_transfer_instrument()│
//! │  ├── payments()              │   └──────────────────────────────────┘
//! │  └── payment_details()       │                   ▲
//! └──────────────────────────────┘                   │
//!                ▲                          ┌────────┴────────┐
//!        ┌───────┴───────┐                  │  AdyenPlatform  │
//!        │ AdyenCheckout │                  └─────────────────┘
//!        └───────────────┘
//! ```

use crate::checkout::{
    CheckoutSessionResponse, CreateCheckoutSessionRequest, PaymentDetailsRequest,
    PaymentMethodsRequest, PaymentMethodsResponse, PaymentRequest, PaymentResponse,
};
use crate::error::PaymentResult;
use crate::platform::{
    PaymentInstrument, PaymentInstrumentInfo, TransferInstrument, TransferInstrumentInfo,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Checkout operations of a payment processor
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Create a checkout session for the drop-in/components
    async fn create_session(
        &self,
        request: &CreateCheckoutSessionRequest,
    ) -> PaymentResult<CheckoutSessionResponse>;

    /// List payment methods available to the merchant account
    async fn payment_methods(
        &self,
        request: &PaymentMethodsRequest,
    ) -> PaymentResult<PaymentMethodsResponse>;

    /// Submit a payment
    async fn payments(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse>;

    /// Submit additional details (after a redirect or a 3DS action)
    async fn payment_details(
        &self,
        request: &PaymentDetailsRequest,
    ) -> PaymentResult<PaymentResponse>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Balance platform and legal entity operations
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Issue a payment instrument (card)
    async fn create_payment_instrument(
        &self,
        info: &PaymentInstrumentInfo,
    ) -> PaymentResult<PaymentInstrument>;

    /// Attach a bank account to a legal entity
    async fn create_transfer_instrument(
        &self,
        info: &TransferInstrumentInfo,
    ) -> PaymentResult<TransferInstrument>;
}

/// Type alias for a shared checkout gateway (dynamic dispatch)
pub type BoxedCheckoutGateway = Arc<dyn CheckoutGateway>;

/// Type alias for a shared platform gateway
pub type BoxedPlatformGateway = Arc<dyn PlatformGateway>;
