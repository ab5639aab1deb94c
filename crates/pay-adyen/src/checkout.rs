//! # Adyen Checkout API
//!
//! Sessions, payment methods, payments and payment details.

use crate::client::{AdyenClient, PROVIDER};
use async_trait::async_trait;
use pay_core::{
    CheckoutGateway, CheckoutSessionResponse, CreateCheckoutSessionRequest,
    PaymentDetailsRequest, PaymentMethodsRequest, PaymentMethodsResponse, PaymentRequest,
    PaymentResponse, PaymentResult,
};
use tracing::{info, instrument};

/// Checkout gateway backed by the Adyen Checkout API
pub struct AdyenCheckout {
    client: AdyenClient,
}

impl AdyenCheckout {
    pub fn new(client: AdyenClient) -> Self {
        Self { client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.client.config().checkout_base_url, path)
    }

    fn api_key(&self) -> &str {
        &self.client.config().api_key
    }
}

#[async_trait]
impl CheckoutGateway for AdyenCheckout {
    #[instrument(skip(self, request), fields(reference = %request.reference))]
    async fn create_session(
        &self,
        request: &CreateCheckoutSessionRequest,
    ) -> PaymentResult<CheckoutSessionResponse> {
        let session: CheckoutSessionResponse = self
            .client
            .post(
                &self.url("/sessions"),
                self.api_key(),
                request,
                Some(request.reference.as_str()),
            )
            .await?;

        info!("Created Adyen session: id={}", session.id);
        Ok(session)
    }

    #[instrument(skip(self, request))]
    async fn payment_methods(
        &self,
        request: &PaymentMethodsRequest,
    ) -> PaymentResult<PaymentMethodsResponse> {
        self.client
            .post(&self.url("/paymentMethods"), self.api_key(), request, None)
            .await
    }

    #[instrument(skip(self, request), fields(reference = %request.reference))]
    async fn payments(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse> {
        let idempotency_key = Some(request.reference.as_str()).filter(|r| !r.is_empty());
        let response: PaymentResponse = self
            .client
            .post(&self.url("/payments"), self.api_key(), request, idempotency_key)
            .await?;

        info!(
            "Payment submitted: result={:?}, psp={:?}",
            response.result_code, response.psp_reference
        );
        Ok(response)
    }

    #[instrument(skip(self, request))]
    async fn payment_details(
        &self,
        request: &PaymentDetailsRequest,
    ) -> PaymentResult<PaymentResponse> {
        let response: PaymentResponse = self
            .client
            .post(&self.url("/payments/details"), self.api_key(), request, None)
            .await?;

        info!(
            "Payment details submitted: result={:?}, psp={:?}",
            response.result_code, response.psp_reference
        );
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
