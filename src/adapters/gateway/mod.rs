//! Payment gateway adapters.
//!
//! - `HttpPaymentGateway` - Production adapter over HTTPS
//! - `MockPaymentGateway` - Configurable test double

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{
    classify_response, HttpGatewayConfig, HttpPaymentGateway, CHECKOUT_PATH,
    DEFAULT_GATEWAY_TIMEOUT,
};
pub use mock_gateway::MockPaymentGateway;
