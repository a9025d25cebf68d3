//! HTTP DTOs (Data Transfer Objects) for checkout endpoints.
//!
//! These types define the JSON request/response structure for the checkout API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::checkout::{CreatePaymentRequestCommand, PaymentStatusEvent};
use crate::domain::billing::{CallbackStatus, OrderReference, TransactionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a plan checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequestBody {
    /// Plan identifier, e.g. `pro` or `free_trial`.
    pub plan_type: String,
    /// ISO 4217 code; the configured default applies when absent.
    #[serde(default)]
    pub currency: Option<String>,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    #[serde(default)]
    pub user_phone: Option<String>,
}

impl From<CreatePaymentRequestBody> for CreatePaymentRequestCommand {
    fn from(body: CreatePaymentRequestBody) -> Self {
        Self {
            plan_type: body.plan_type,
            currency: body.currency,
            user_id: body.user_id,
            user_email: body.user_email,
            user_name: body.user_name,
            user_phone: body.user_phone,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Acknowledgement of a verified callback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAckResponse {
    pub received: bool,
    pub status: CallbackStatus,
    pub order_reference: OrderReference,
    pub transaction_status: TransactionStatus,
}

impl From<PaymentStatusEvent> for CallbackAckResponse {
    fn from(event: PaymentStatusEvent) -> Self {
        Self {
            received: true,
            status: event.status,
            order_reference: event.order_reference,
            transaction_status: event.transaction_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
