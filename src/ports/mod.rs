//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Submits signed checkout requests to the gateway

mod payment_gateway;

pub use payment_gateway::{GatewaySession, PaymentError, PaymentErrorKind, PaymentGateway};
