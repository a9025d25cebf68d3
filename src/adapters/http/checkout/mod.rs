//! HTTP adapter for checkout endpoints.
//!
//! - `POST /api/checkout` - Start a plan checkout
//! - `POST /api/webhooks/payment` - Handle gateway status callbacks
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::CheckoutAppState;
pub use routes::checkout_router;
