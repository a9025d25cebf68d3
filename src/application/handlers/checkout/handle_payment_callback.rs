//! HandlePaymentCallbackHandler - Command handler for gateway status callbacks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::billing::{
    CallbackError, CallbackStatus, CallbackValidator, Currency, OrderReference, TransactionStatus,
};

/// Verified payment status change, ready for whoever owns transaction state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusEvent {
    pub order_reference: OrderReference,
    pub transaction_id: String,
    pub status: CallbackStatus,
    /// Status of the transaction once this callback is applied.
    pub transaction_status: TransactionStatus,
    pub amount: Decimal,
    pub currency: Currency,
    pub payment_method: String,
    pub received_at: DateTime<Utc>,
}

/// Handler for payment callbacks.
///
/// Nothing past this handler sees a callback that failed verification.
/// Callbacks settle transactions that were submitted to the gateway, so the
/// verified status is applied to a `Pending` transaction.
pub struct HandlePaymentCallbackHandler {
    validator: CallbackValidator,
}

impl HandlePaymentCallbackHandler {
    pub fn new(validator: CallbackValidator) -> Self {
        Self { validator }
    }

    pub fn handle(&self, body: &[u8]) -> Result<PaymentStatusEvent, CallbackError> {
        let trusted = self.validator.validate_raw(body)?;
        let transaction_status = TransactionStatus::Pending
            .apply_callback(&trusted)
            .map_err(|e| CallbackError::InvalidTransition(e.to_string()))?;
        let payload = trusted.into_payload();

        tracing::info!(
            order_reference = %payload.order_reference,
            transaction_id = %payload.transaction_id,
            status = %payload.status,
            "Accepted payment callback"
        );

        Ok(PaymentStatusEvent {
            order_reference: payload.order_reference,
            transaction_id: payload.transaction_id,
            status: payload.status,
            transaction_status,
            amount: payload.amount,
            currency: payload.currency,
            payment_method: payload.payment_method,
            received_at: Utc::now(),
        })
    }
}
