//! Payment gateway port.
//!
//! Defines the contract for submitting signed checkout requests to an
//! external payment gateway. The gateway answers with a hosted payment page
//! the customer is redirected to; the final outcome arrives later as a
//! signed callback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::billing::{BuildError, CatalogError, PaymentRequest};
use crate::domain::foundation::ValidationError;

/// Port for payment gateway integrations.
///
/// Implementations perform exactly one submission per call and never retry
/// on their own.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits a signed payment request.
    ///
    /// Returns the hosted payment page on success.
    async fn send(&self, request: &PaymentRequest) -> Result<GatewaySession, PaymentError>;
}

/// Hosted payment page returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySession {
    /// URL the customer must be redirected to.
    pub payment_url: String,

    /// Gateway-side transaction identifier, when the gateway sends one.
    pub transaction_id: Option<String>,
}

/// Errors from checkout operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error kind for categorization.
    pub kind: PaymentErrorKind,

    /// Human-readable message.
    pub message: String,

    /// HTTP status returned by the gateway, if one was received.
    pub http_status: Option<u16>,
}

impl PaymentError {
    pub fn new(kind: PaymentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn invalid_plan(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::InvalidPlan, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::InvalidRequest, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::NetworkError, message)
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::PaymentApiError, message).with_http_status(status)
    }

    pub fn creation_failed(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::PaymentCreationFailed, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<CatalogError> for PaymentError {
    fn from(err: CatalogError) -> Self {
        PaymentError::invalid_plan(err.to_string())
    }
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::invalid_request(err.to_string())
    }
}

impl From<BuildError> for PaymentError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Catalog(e) => e.into(),
            BuildError::Signature(e) => PaymentError::creation_failed(e.to_string()),
        }
    }
}

/// Payment error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentErrorKind {
    /// Plan or currency has no catalog entry.
    InvalidPlan,

    /// Caller input could not be used to build a request.
    InvalidRequest,

    /// Gateway unreachable, connection dropped or timed out.
    NetworkError,

    /// Gateway answered with a non-success HTTP status.
    PaymentApiError,

    /// Gateway answered but produced no payment URL.
    PaymentCreationFailed,
}

impl PaymentErrorKind {
    /// Only transport failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorKind::NetworkError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentErrorKind::InvalidPlan => "INVALID_PLAN",
            PaymentErrorKind::InvalidRequest => "INVALID_REQUEST",
            PaymentErrorKind::NetworkError => "NETWORK_ERROR",
            PaymentErrorKind::PaymentApiError => "PAYMENT_API_ERROR",
            PaymentErrorKind::PaymentCreationFailed => "PAYMENT_CREATION_FAILED",
        }
    }
}

impl std::fmt::Display for PaymentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{Currency, PlanType};

    #[test]
    fn kinds_serialize_screaming_snake_case() {
        let json = serde_json::to_string(&PaymentErrorKind::PaymentCreationFailed).unwrap();
        assert_eq!(json, "\"PAYMENT_CREATION_FAILED\"");

        for kind in [
            PaymentErrorKind::InvalidPlan,
            PaymentErrorKind::InvalidRequest,
            PaymentErrorKind::NetworkError,
            PaymentErrorKind::PaymentApiError,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(PaymentError::network("timeout").is_retryable());
        assert!(!PaymentError::api(500, "boom").is_retryable());
        assert!(!PaymentError::creation_failed("no url").is_retryable());
        assert!(!PaymentError::invalid_plan("nope").is_retryable());
    }

    #[test]
    fn api_error_carries_status() {
        let err = PaymentError::api(502, "bad gateway");
        assert_eq!(err.kind, PaymentErrorKind::PaymentApiError);
        assert_eq!(err.http_status, Some(502));
        assert_eq!(err.to_string(), "PAYMENT_API_ERROR: bad gateway");
    }

    #[test]
    fn missing_catalog_row_is_invalid_plan() {
        let err: PaymentError = CatalogError::NotFound {
            plan: PlanType::Ultimate,
            currency: Currency::Usd,
        }
        .into();
        assert_eq!(err.kind, PaymentErrorKind::InvalidPlan);
    }

    #[test]
    fn validation_error_is_invalid_request() {
        let err: PaymentError = ValidationError::empty_field("user_id").into();
        assert_eq!(err.kind, PaymentErrorKind::InvalidRequest);
    }

    #[test]
    fn trait_is_object_safe() {
        fn _accepts(_gateway: &dyn PaymentGateway) {}
    }
}
