//! HTTP handlers for checkout endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::checkout::{
    CheckoutResult, CreatePaymentRequestHandler, HandlePaymentCallbackHandler,
};
use crate::domain::billing::CallbackError;
use crate::ports::PaymentErrorKind;

use super::dto::{CallbackAckResponse, CreatePaymentRequestBody, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for checkout routes.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub checkout_handler: Arc<CreatePaymentRequestHandler>,
    pub callback_handler: Arc<HandlePaymentCallbackHandler>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/checkout - Start a plan checkout
///
/// Always answers with the caller-facing result body; the HTTP status tells
/// caller mistakes (400) apart from gateway trouble (502).
pub async fn create_checkout(
    State(state): State<CheckoutAppState>,
    Json(request): Json<CreatePaymentRequestBody>,
) -> impl IntoResponse {
    let result = state.checkout_handler.handle(request.into()).await;
    (checkout_status(&result), Json(result))
}

/// POST /api/webhooks/payment - Receive a gateway status callback
pub async fn handle_payment_callback(
    State(state): State<CheckoutAppState>,
    body: Bytes,
) -> Result<Json<CallbackAckResponse>, CallbackApiError> {
    let event = state.callback_handler.handle(&body)?;
    Ok(Json(CallbackAckResponse::from(event)))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub(crate) fn checkout_status(result: &CheckoutResult) -> StatusCode {
    match result.error_kind() {
        None => StatusCode::OK,
        Some(PaymentErrorKind::InvalidPlan | PaymentErrorKind::InvalidRequest) => {
            StatusCode::BAD_REQUEST
        }
        Some(
            PaymentErrorKind::NetworkError
            | PaymentErrorKind::PaymentApiError
            | PaymentErrorKind::PaymentCreationFailed,
        ) => StatusCode::BAD_GATEWAY,
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts callback errors to HTTP responses.
pub struct CallbackApiError(CallbackError);

impl From<CallbackError> for CallbackApiError {
    fn from(err: CallbackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CallbackApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (self.0.status_code(), Json(body)).into_response()
    }
}
