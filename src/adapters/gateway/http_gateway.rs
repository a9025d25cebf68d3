//! HTTP payment gateway adapter.
//!
//! Submits signed checkout requests with `reqwest` and classifies the
//! gateway's answer into a [`GatewaySession`] or a [`PaymentError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::domain::billing::PaymentRequest;
use crate::ports::{GatewaySession, PaymentError, PaymentGateway};

/// Path of the checkout endpoint, relative to the gateway host.
pub const CHECKOUT_PATH: &str = "/api/v1/checkout";

/// Default bound on a single gateway call.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

const CREATION_FAILED_MESSAGE: &str = "Payment gateway did not return a payment URL";

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL of the gateway, e.g. `https://pay.example.com`.
    pub gateway_host: String,
    /// Bound on connect plus response time.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    pub fn new(gateway_host: impl Into<String>) -> Self {
        Self {
            gateway_host: gateway_host.into(),
            timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full checkout URL, tolerating a trailing slash on the host.
    pub fn checkout_url(&self) -> String {
        format!("{}{}", self.gateway_host.trim_end_matches('/'), CHECKOUT_PATH)
    }
}

/// Payment gateway reached over HTTPS.
pub struct HttpPaymentGateway {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpPaymentGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> PaymentError {
        if e.is_timeout() {
            PaymentError::network(format!(
                "Payment gateway timed out after {}s",
                self.config.timeout.as_secs()
            ))
        } else if e.is_connect() {
            PaymentError::network(format!("Could not connect to payment gateway: {}", e))
        } else {
            PaymentError::network(e.to_string())
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn send(&self, request: &PaymentRequest) -> Result<GatewaySession, PaymentError> {
        tracing::info!(
            order_reference = %request.order_reference,
            amount = %request.amount,
            currency = %request.currency,
            "Submitting payment request to gateway"
        );

        let response = self
            .client
            .post(self.config.checkout_url())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let result = classify_response(status, &body);
        match &result {
            Ok(session) => tracing::info!(
                order_reference = %request.order_reference,
                transaction_id = session.transaction_id.as_deref().unwrap_or(""),
                "Payment gateway created checkout"
            ),
            Err(e) => tracing::warn!(
                order_reference = %request.order_reference,
                http_status = status,
                error_kind = %e.kind,
                message = %e.message,
                "Payment gateway rejected checkout"
            ),
        }
        result
    }
}

/// Classifies a gateway HTTP answer.
///
/// An unparseable body is treated as an empty object.
pub fn classify_response(status: u16, body: &str) -> Result<GatewaySession, PaymentError> {
    let body = parse_body(body);
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());

    if !(200..300).contains(&status) {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Payment gateway returned HTTP {}", status));
        return Err(PaymentError::api(status, message));
    }

    let succeeded = body.get("success").and_then(Value::as_bool) == Some(true);
    let payment_url = body
        .get("paymentUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty());

    match payment_url {
        Some(payment_url) if succeeded => Ok(GatewaySession {
            payment_url: payment_url.to_string(),
            transaction_id: body.get("transactionId").and_then(scalar_to_string),
        }),
        _ => Err(PaymentError::creation_failed(
            message.unwrap_or(CREATION_FAILED_MESSAGE),
        )
        .with_http_status(status)),
    }
}

fn parse_body(body: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PaymentErrorKind;

    // ══════════════════════════════════════════════════════════════
    // Non-2xx
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn server_error_uses_body_message() {
        let err = classify_response(500, r#"{"message":"boom"}"#).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentApiError);
        assert_eq!(err.message, "boom");
        assert_eq!(err.http_status, Some(500));
    }

    #[test]
    fn server_error_without_message_uses_status() {
        let err = classify_response(503, "<html>down</html>").unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentApiError);
        assert_eq!(err.message, "Payment gateway returned HTTP 503");
    }

    #[test]
    fn client_error_with_empty_body_uses_status() {
        let err = classify_response(401, "").unwrap_err();
        assert_eq!(err.message, "Payment gateway returned HTTP 401");
    }

    #[test]
    fn non_string_message_is_ignored() {
        let err = classify_response(422, r#"{"message":{"field":"amount"}}"#).unwrap_err();
        assert_eq!(err.message, "Payment gateway returned HTTP 422");
    }

    #[test]
    fn redirect_status_is_api_error() {
        let err = classify_response(302, "").unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentApiError);
    }

    // ══════════════════════════════════════════════════════════════
    // 2xx
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn success_with_url_returns_session() {
        let session = classify_response(
            200,
            r#"{"success":true,"paymentUrl":"https://pay.example.com/p/abc","transactionId":"txn_1"}"#,
        )
        .unwrap();

        assert_eq!(session.payment_url, "https://pay.example.com/p/abc");
        assert_eq!(session.transaction_id.as_deref(), Some("txn_1"));
    }

    #[test]
    fn numeric_transaction_id_is_accepted() {
        let session = classify_response(
            201,
            r#"{"success":true,"paymentUrl":"https://p/x","transactionId":98765}"#,
        )
        .unwrap();
        assert_eq!(session.transaction_id.as_deref(), Some("98765"));
    }

    #[test]
    fn missing_transaction_id_is_none() {
        let session = classify_response(200, r#"{"success":true,"paymentUrl":"https://p/x"}"#).unwrap();
        assert_eq!(session.transaction_id, None);
    }

    #[test]
    fn success_without_url_is_creation_failure() {
        let err = classify_response(200, r#"{"success":true}"#).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentCreationFailed);
        assert_eq!(err.message, CREATION_FAILED_MESSAGE);
    }

    #[test]
    fn url_without_success_flag_is_creation_failure() {
        let err = classify_response(200, r#"{"paymentUrl":"https://p/x"}"#).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentCreationFailed);
    }

    #[test]
    fn success_string_true_is_not_success() {
        let err = classify_response(200, r#"{"success":"true","paymentUrl":"https://p/x"}"#).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentCreationFailed);
    }

    #[test]
    fn creation_failure_prefers_body_message() {
        let err = classify_response(200, r#"{"success":false,"message":"card blocked"}"#).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentCreationFailed);
        assert_eq!(err.message, "card blocked");
    }

    #[test]
    fn unparseable_success_body_is_creation_failure() {
        let err = classify_response(200, "ok").unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::PaymentCreationFailed);
    }

    // ══════════════════════════════════════════════════════════════
    // Config
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn checkout_url_tolerates_trailing_slash() {
        assert_eq!(
            HttpGatewayConfig::new("https://gw.example.com/").checkout_url(),
            "https://gw.example.com/api/v1/checkout"
        );
        assert_eq!(
            HttpGatewayConfig::new("https://gw.example.com").checkout_url(),
            "https://gw.example.com/api/v1/checkout"
        );
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(HttpGatewayConfig::new("https://gw").timeout, Duration::from_secs(30));
    }
}
