//! Errors raised while validating gateway callbacks.

use http::StatusCode;
use thiserror::Error;

/// Reasons a callback is not trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// Recomputed signature does not match the one received.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Payload carries no signature at all.
    #[error("Missing signature")]
    MissingSignature,

    /// Callback is older than the accepted window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Callback timestamp is unreadable or too far in the future.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Body is not a well-formed callback.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Verified status cannot be applied to the transaction.
    #[error("Status change rejected: {0}")]
    InvalidTransition(String),
}

impl CallbackError {
    /// HTTP status to answer the gateway with.
    ///
    /// Signature and age failures are `401`; malformed input is `400`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CallbackError::InvalidSignature
            | CallbackError::MissingSignature
            | CallbackError::TimestampOutOfRange => StatusCode::UNAUTHORIZED,
            CallbackError::InvalidTimestamp | CallbackError::ParseError(_) => {
                StatusCode::BAD_REQUEST
            }
            CallbackError::InvalidTransition(_) => StatusCode::CONFLICT,
        }
    }

    /// Stable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CallbackError::InvalidSignature => "INVALID_SIGNATURE",
            CallbackError::MissingSignature => "MISSING_SIGNATURE",
            CallbackError::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            CallbackError::InvalidTimestamp => "INVALID_TIMESTAMP",
            CallbackError::ParseError(_) => "INVALID_PAYLOAD",
            CallbackError::InvalidTransition(_) => "INVALID_TRANSITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_failures_are_unauthorized() {
        assert_eq!(CallbackError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(CallbackError::MissingSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            CallbackError::TimestampOutOfRange.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn malformed_input_is_bad_request() {
        assert_eq!(CallbackError::InvalidTimestamp.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CallbackError::ParseError("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn rejected_status_change_is_conflict() {
        let err = CallbackError::InvalidTransition("Approved to Pending".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INVALID_TRANSITION");
    }

    #[test]
    fn parse_error_displays_detail() {
        let err = CallbackError::ParseError("missing field `status`".to_string());
        assert_eq!(err.to_string(), "Parse error: missing field `status`");
        assert_eq!(err.code(), "INVALID_PAYLOAD");
    }
}
