//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the gateways, the webhook validator, the order template and
//! the in-process stores.

use crate::consumer::EventConsumer;
use crate::store::PaymentDataStore;
use pay_adyen::{AdyenClient, HmacValidator, LoggingNotificationHandler};
use pay_core::{BoxedCheckoutGateway, BoxedPlatformGateway, OrderTemplate};
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Merchant account sent with every checkout call
    pub merchant_account: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env(merchant_account: impl Into<String>) -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            merchant_account: merchant_account.into(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// `host:port` used in return URLs when the request carries no Host header
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout API
    pub checkout: BoxedCheckoutGateway,
    /// Balance platform & legal entity APIs
    pub platform: BoxedPlatformGateway,
    /// Webhook signature validator
    pub hmac: Arc<HmacValidator>,
    /// Receives accepted notification items
    pub events: EventConsumer,
    /// `paymentData` by order reference
    pub payment_data: PaymentDataStore,
    /// Order sent with every session
    pub order: OrderTemplate,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Adyen, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let client = AdyenClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Adyen: {}", e))?;

        let adyen = client.config();
        info!("Adyen environment: {}", adyen.environment.as_str());
        if !adyen.is_test_mode() {
            warn!("Payments will be processed on the LIVE platform");
        }

        let config = AppConfig::from_env(&adyen.merchant_account);
        let hmac = HmacValidator::new(&adyen.hmac_key)
            .map_err(|e| anyhow::anyhow!("Invalid webhook key: {}", e))?;

        let order = load_order_template()?;

        Ok(Self::with_gateways(
            config,
            Arc::new(client.checkout()),
            Arc::new(client.platform()),
            hmac,
            EventConsumer::spawn(Arc::new(LoggingNotificationHandler)),
        )
        .with_order(order))
    }

    /// Assemble state from already constructed parts
    pub fn with_gateways(
        config: AppConfig,
        checkout: BoxedCheckoutGateway,
        platform: BoxedPlatformGateway,
        hmac: HmacValidator,
        events: EventConsumer,
    ) -> Self {
        Self {
            checkout,
            platform,
            hmac: Arc::new(hmac),
            events,
            payment_data: PaymentDataStore::new(),
            order: OrderTemplate::default(),
            config,
        }
    }

    /// Replace the order template
    pub fn with_order(mut self, order: OrderTemplate) -> Self {
        self.order = order;
        self
    }
}

/// Load the order template from config file
fn load_order_template() -> anyhow::Result<OrderTemplate> {
    let config_paths = [
        "config/checkout.toml",
        "../config/checkout.toml",
        "../../config/checkout.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let order = OrderTemplate::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            info!("Loaded {} line items from {}", order.line_items.len(), path);
            check_order_template(&order);
            return Ok(order);
        }
    }

    warn!("No checkout config found, using default order");
    Ok(OrderTemplate::default())
}

/// Line items must add up to the order amount for Klarna-style methods
fn check_order_template(order: &OrderTemplate) -> bool {
    let total = order.line_items_total();
    if !order.line_items.is_empty() && total != order.amount.value {
        warn!(
            "Line items total {} does not match order amount {} {}",
            total, order.amount.value, order.amount.currency
        );
        return false;
    }
    true
}
