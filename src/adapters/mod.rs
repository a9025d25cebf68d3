//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `gateway` - Payment gateway clients (HTTP, mock)
//! - `http` - Axum REST API

pub mod gateway;
pub mod http;

pub use gateway::{HttpGatewayConfig, HttpPaymentGateway, MockPaymentGateway};
pub use http::{checkout_router, CheckoutAppState};
