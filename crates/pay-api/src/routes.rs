//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Checkout:
///   - POST /api/sessions - Create a drop-in session
///   - POST /api/getPaymentMethods - List payment methods
///   - POST /api/initiatePayment - Submit a payment
///   - POST /api/submitAdditionalDetails - Submit action details
///   - GET|POST /api/handleShopperRedirect - Resolve a shopper redirect
///
/// - Platform:
///   - POST /api/issuing/createCard - Issue a card
///   - POST /api/lem/createTransferInstrument - Add a bank account
///
/// - Webhooks:
///   - POST /api/webhooks/notifications - Standard notifications
///
/// - Static pages:
///   - GET /result/{status} - Result page
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Checkout
        .route("/sessions", post(handlers::create_session))
        .route("/getPaymentMethods", post(handlers::get_payment_methods))
        .route("/initiatePayment", post(handlers::initiate_payment))
        .route(
            "/submitAdditionalDetails",
            post(handlers::submit_additional_details),
        )
        .route(
            "/handleShopperRedirect",
            get(handlers::shopper_redirect_get).post(handlers::shopper_redirect_post),
        )
        // Platform
        .route("/issuing/createCard", post(handlers::create_card))
        .route(
            "/lem/createTransferInstrument",
            post(handlers::create_transfer_instrument),
        )
        .layer(cors)
        // Webhooks are server-to-server, added after the CORS layer
        .route(
            "/webhooks/notifications",
            post(handlers::webhook_notifications),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/result/{status}", get(handlers::result_page))
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
