//! Axum router configuration for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_checkout, handle_payment_callback, health, CheckoutAppState};

/// Checkout routes, mounted under `/api`.
///
/// # Routes
/// - `POST /checkout` - Start a plan checkout
pub fn checkout_routes() -> Router<CheckoutAppState> {
    Router::new().route("/checkout", post(create_checkout))
}

/// Gateway callback routes, mounted under `/api/webhooks`.
///
/// Callbacks carry no user session; they are trusted only after signature
/// verification.
///
/// # Routes
/// - `POST /payment` - Handle gateway status callbacks
pub fn webhook_routes() -> Router<CheckoutAppState> {
    Router::new().route("/payment", post(handle_payment_callback))
}

/// Create the complete checkout router.
///
/// # Example
///
/// ```ignore
/// let app = checkout_router().with_state(state);
/// ```
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new()
        .nest("/api", checkout_routes().nest("/webhooks", webhook_routes()))
        .route("/health", get(health))
}
