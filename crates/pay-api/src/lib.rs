//! # pay-api
//!
//! HTTP API layer for adyen-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the drop-in and components
//! - Webhook handler for standard notifications
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/sessions` | Create checkout session |
//! | POST | `/api/getPaymentMethods` | List payment methods |
//! | POST | `/api/initiatePayment` | Submit a payment |
//! | POST | `/api/submitAdditionalDetails` | Submit action details |
//! | GET/POST | `/api/handleShopperRedirect` | Resolve redirect, 302 to result |
//! | POST | `/api/webhooks/notifications` | Adyen webhook |
//! | POST | `/api/issuing/createCard` | Issue a card |
//! | POST | `/api/lem/createTransferInstrument` | Add a bank account |
//! | GET | `/result/{status}` | Result page |

pub mod consumer;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;

pub use consumer::EventConsumer;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
pub use store::PaymentDataStore;
