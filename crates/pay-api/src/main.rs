//! # adyen-checkout
//!
//! Checkout sample service for Adyen.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ADYEN_API_KEY=AQE...
//! export ADYEN_MERCHANT_ACCOUNT=YourMerchantAccount
//! export ADYEN_CLIENT_KEY=test_...
//! export ADYEN_HMAC_KEY=44782DEF...
//!
//! # Run the server
//! adyen-checkout
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;
    let addr = state.config.socket_addr()?;

    info!("Merchant account: {}", state.config.merchant_account);
    info!("Checkout gateway: {}", state.checkout.provider_name());
    info!("Order: {} line items", state.order.line_items.len());

    let app = routes::create_router(state);

    info!("🚀 Checkout service starting on http://{}", addr);
    info!("💳 Sessions: POST http://{}/api/sessions", addr);
    info!("🔔 Webhook: POST http://{}/api/webhooks/notifications", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn print_banner() {
    println!(
        r#"
  Adyen Checkout RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Drop-in & components backend
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
