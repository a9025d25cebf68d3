//! Mock payment gateway for testing.
//!
//! Records every request it receives and answers with a configurable
//! session or error. Clones share state, so a test can keep a handle while
//! the handler owns another.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::billing::PaymentRequest;
use crate::ports::{GatewaySession, PaymentError, PaymentGateway};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// gateway.set_error(PaymentError::api(500, "boom"));
///
/// let result = gateway.send(&request).await;
/// assert_eq!(gateway.call_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Session to return on success.
    session: Option<GatewaySession>,

    /// Error to return instead of a session.
    error: Option<PaymentError>,

    /// Every request received, in order.
    requests: Vec<PaymentRequest>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that always answers with `session`.
    pub fn succeeding(session: GatewaySession) -> Self {
        let mock = Self::new();
        mock.set_session(session);
        mock
    }

    /// A gateway that always answers with `error`.
    pub fn failing(error: PaymentError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn set_session(&self, session: GatewaySession) {
        let mut state = self.inner.lock().unwrap();
        state.session = Some(session);
        state.error = None;
    }

    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// All requests received so far.
    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub fn last_request(&self) -> Option<PaymentRequest> {
        self.inner.lock().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn send(&self, request: &PaymentRequest) -> Result<GatewaySession, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request.clone());

        if let Some(error) = &state.error {
            return Err(error.clone());
        }

        state
            .session
            .clone()
            .ok_or_else(|| PaymentError::creation_failed("Mock gateway has no session configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{Currency, OrderReference};
    use crate::ports::PaymentErrorKind;
    use rust_decimal::Decimal;

    fn request() -> PaymentRequest {
        PaymentRequest {
            merchant_key: "mk".to_string(),
            merchant_name: "Acme".to_string(),
            amount: Decimal::new(8990, 2),
            currency: Currency::Brl,
            order_reference: OrderReference::from("SUB-pro-u1-1".to_string()),
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.com".to_string(),
            customer_phone: None,
            callback_url: "https://acme.example.com/cb".to_string(),
            return_url: "https://acme.example.com/ok".to_string(),
            cancel_url: "https://acme.example.com/cancel".to_string(),
            description: "Pro plan - 1 month".to_string(),
            signature: "sig".to_string(),
        }
    }

    #[tokio::test]
    async fn records_requests_and_returns_session() {
        let gateway = MockPaymentGateway::succeeding(GatewaySession {
            payment_url: "https://pay/x".to_string(),
            transaction_id: Some("txn".to_string()),
        });

        let session = gateway.send(&request()).await.unwrap();

        assert_eq!(session.payment_url, "https://pay/x");
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(gateway.last_request(), Some(request()));
    }

    #[tokio::test]
    async fn configured_error_is_returned_every_time() {
        let gateway = MockPaymentGateway::failing(PaymentError::network("down"));

        for _ in 0..2 {
            let err = gateway.send(&request()).await.unwrap_err();
            assert_eq!(err.kind, PaymentErrorKind::NetworkError);
        }
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let gateway = MockPaymentGateway::new();
        let handle = gateway.clone();

        let _ = gateway.send(&request()).await;

        assert!(handle.was_called());
    }

    #[test]
    fn fresh_mock_was_not_called() {
        assert!(!MockPaymentGateway::new().was_called());
    }
}
