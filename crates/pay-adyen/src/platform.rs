//! # Balance Platform & Legal Entities
//!
//! Card issuing through the balance platform configuration API and
//! transfer instruments through legal entity management.

use crate::client::AdyenClient;
use async_trait::async_trait;
use pay_core::{
    PaymentInstrument, PaymentInstrumentInfo, PaymentResult, PlatformGateway,
    TransferInstrument, TransferInstrumentInfo,
};
use tracing::{info, instrument};

pub struct AdyenPlatform {
    client: AdyenClient,
}

impl AdyenPlatform {
    pub fn new(client: AdyenClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlatformGateway for AdyenPlatform {
    #[instrument(skip(self, info), fields(balance_account = %info.balance_account_id))]
    async fn create_payment_instrument(
        &self,
        info: &PaymentInstrumentInfo,
    ) -> PaymentResult<PaymentInstrument> {
        info.validate()?;

        let config = self.client.config();
        let url = format!("{}/paymentInstruments", config.balance_platform_base_url);
        let instrument: PaymentInstrument = self
            .client
            .post(&url, &config.balance_platform_api_key, info, None)
            .await?;

        info!(
            "Created payment instrument: id={}, status={:?}",
            instrument.id, instrument.status
        );
        Ok(instrument)
    }

    #[instrument(skip(self, info), fields(legal_entity = %info.legal_entity_id))]
    async fn create_transfer_instrument(
        &self,
        info: &TransferInstrumentInfo,
    ) -> PaymentResult<TransferInstrument> {
        info.validate()?;

        let config = self.client.config();
        let url = format!("{}/transferInstruments", config.legal_entity_base_url);
        let instrument: TransferInstrument = self
            .client
            .post(&url, &config.legal_entity_api_key, info, None)
            .await?;

        info!("Created transfer instrument: id={}", instrument.id);
        Ok(instrument)
    }
}
