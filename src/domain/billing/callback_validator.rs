//! Trust boundary for gateway callbacks.
//!
//! A callback's status may only be acted on after its signature has been
//! recomputed over every other field and matched. [`TrustedCallback`] can
//! only be produced here, so code that changes transaction state by taking a
//! `TrustedCallback` cannot be reached with an unverified payload.
//!
//! # Verification Steps
//!
//! 1. Parse the body as a JSON object
//! 2. Recompute the signature over all fields except `signature`
//! 3. Compare with the received signature in constant time
//! 4. Parse the typed payload
//! 5. Optionally reject callbacks outside the replay window

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use super::callback::{CallbackPayload, CallbackStatus};
use super::callback_errors::CallbackError;
use super::order_reference::OrderReference;
use super::signature::{fields_from_json, SignatureEngine, SIGNATURE_FIELD};

/// Allowed clock skew for callbacks stamped in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Longest replay window a validator accepts (one week).
pub const MAX_CALLBACK_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// A callback whose signature has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedCallback {
    payload: CallbackPayload,
}

impl TrustedCallback {
    pub fn payload(&self) -> &CallbackPayload {
        &self.payload
    }

    pub fn status(&self) -> CallbackStatus {
        self.payload.status
    }

    pub fn order_reference(&self) -> &OrderReference {
        &self.payload.order_reference
    }

    pub fn into_payload(self) -> CallbackPayload {
        self.payload
    }
}

/// Verifies callback signatures with the shared merchant secret.
#[derive(Debug, Clone)]
pub struct CallbackValidator {
    signer: SignatureEngine,
    max_age: Option<Duration>,
}

impl CallbackValidator {
    pub fn new(signer: SignatureEngine) -> Self {
        Self {
            signer,
            max_age: None,
        }
    }

    /// Also rejects callbacks older than `secs` seconds, capped at
    /// [`MAX_CALLBACK_AGE_SECS`].
    pub fn with_max_age_secs(mut self, secs: i64) -> Self {
        self.max_age = Some(Duration::seconds(secs.clamp(0, MAX_CALLBACK_AGE_SECS)));
        self
    }

    /// Validates an already-parsed callback.
    pub fn validate(&self, payload: CallbackPayload) -> Result<TrustedCallback, CallbackError> {
        self.validate_at(payload, Utc::now())
    }

    /// Validates an already-parsed callback against the clock value `now`.
    pub fn validate_at(
        &self,
        payload: CallbackPayload,
        now: DateTime<Utc>,
    ) -> Result<TrustedCallback, CallbackError> {
        if payload.signature.trim().is_empty() {
            tracing::warn!(order_reference = %payload.order_reference, "Callback without signature");
            return Err(CallbackError::MissingSignature);
        }

        let fields = payload
            .signable_fields()
            .map_err(|e| CallbackError::ParseError(e.to_string()))?;

        if !self.signer.verify(&fields, &payload.signature) {
            tracing::warn!(
                order_reference = %payload.order_reference,
                transaction_id = %payload.transaction_id,
                "Callback signature mismatch"
            );
            return Err(CallbackError::InvalidSignature);
        }

        self.check_freshness(&payload, now)?;

        Ok(TrustedCallback { payload })
    }

    /// Validates a raw callback body.
    ///
    /// The signature is checked against the fields exactly as they appear in
    /// the JSON, before any typed parsing.
    pub fn validate_raw(&self, body: &[u8]) -> Result<TrustedCallback, CallbackError> {
        self.validate_raw_at(body, Utc::now())
    }

    pub fn validate_raw_at(
        &self,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<TrustedCallback, CallbackError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse callback body");
            CallbackError::ParseError(e.to_string())
        })?;
        let object = value
            .as_object()
            .ok_or_else(|| CallbackError::ParseError("expected a JSON object".to_string()))?;

        let signature = match object.get(SIGNATURE_FIELD) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
            _ => {
                tracing::warn!("Callback without signature");
                return Err(CallbackError::MissingSignature);
            }
        };

        let fields = fields_from_json(object, &[SIGNATURE_FIELD])
            .map_err(|e| CallbackError::ParseError(e.to_string()))?;

        if !self.signer.verify(&fields, signature) {
            tracing::warn!(
                order_reference = fields.get("orderReference").map(String::as_str).unwrap_or(""),
                "Callback signature mismatch"
            );
            return Err(CallbackError::InvalidSignature);
        }

        let payload: CallbackPayload = serde_json::from_value(value)
            .map_err(|e| CallbackError::ParseError(e.to_string()))?;

        self.check_freshness(&payload, now)?;

        Ok(TrustedCallback { payload })
    }

    fn check_freshness(&self, payload: &CallbackPayload, now: DateTime<Utc>) -> Result<(), CallbackError> {
        let Some(max_age) = self.max_age else {
            return Ok(());
        };

        let sent_at = payload
            .timestamp
            .to_datetime()
            .ok_or(CallbackError::InvalidTimestamp)?;
        let age = now - sent_at;

        if age > max_age {
            tracing::warn!(
                order_reference = %payload.order_reference,
                age_secs = age.num_seconds(),
                "Callback too old - possible replay"
            );
            return Err(CallbackError::TimestampOutOfRange);
        }

        if age < -Duration::seconds(MAX_CLOCK_SKEW_SECS) {
            tracing::warn!(
                order_reference = %payload.order_reference,
                "Callback timestamp in the future"
            );
            return Err(CallbackError::InvalidTimestamp);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::callback::CallbackTimestamp;
    use crate::domain::billing::currency::Currency;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    const SECRET: &str = "whk_callback_secret";

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_704_067_200, 0).unwrap()
    }

    fn unsigned() -> CallbackPayload {
        CallbackPayload {
            transaction_id: "txn_123".to_string(),
            order_reference: OrderReference::from("SUB-pro-u42-1704067100000".to_string()),
            status: CallbackStatus::Approved,
            amount: Decimal::new(1799, 2),
            currency: Currency::Usd,
            payment_method: "credit_card".to_string(),
            timestamp: CallbackTimestamp::Unix(1_704_067_100),
            signature: String::new(),
        }
    }

    fn signed(mut payload: CallbackPayload) -> CallbackPayload {
        let fields = payload.signable_fields().unwrap();
        payload.signature = SignatureEngine::new(SECRET).sign(&fields);
        payload
    }

    fn validator() -> CallbackValidator {
        CallbackValidator::new(SignatureEngine::new(SECRET))
    }

    fn sign_raw(mut body: serde_json::Value) -> Vec<u8> {
        let fields = fields_from_json(body.as_object().unwrap(), &[SIGNATURE_FIELD]).unwrap();
        body["signature"] = Value::String(SignatureEngine::new(SECRET).sign(&fields));
        serde_json::to_vec(&body).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Typed validation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_callback_is_trusted() {
        let payload = signed(unsigned());

        let trusted = validator().validate_at(payload.clone(), now()).unwrap();

        assert_eq!(trusted.status(), CallbackStatus::Approved);
        assert_eq!(trusted.payload(), &payload);
        assert_eq!(trusted.order_reference().as_str(), "SUB-pro-u42-1704067100000");
    }

    #[test]
    fn tampered_amount_is_rejected() {
        let mut payload = signed(unsigned());
        payload.amount = Decimal::new(1, 2);

        let result = validator().validate_at(payload, now());

        assert_eq!(result, Err(CallbackError::InvalidSignature));
    }

    #[test]
    fn every_tampered_field_is_rejected() {
        let original = signed(unsigned());
        let tamperings: Vec<fn(&mut CallbackPayload)> = vec![
            |p| p.transaction_id.push('x'),
            |p| p.order_reference = OrderReference::from("SUB-pro-u43-1".to_string()),
            |p| p.status = CallbackStatus::Rejected,
            |p| p.amount = Decimal::new(1800, 2),
            |p| p.currency = Currency::Brl,
            |p| p.payment_method = "pix".to_string(),
            |p| p.timestamp = CallbackTimestamp::Unix(1_704_067_101),
        ];

        for tamper in tamperings {
            let mut payload = original.clone();
            tamper(&mut payload);
            assert_eq!(
                validator().validate_at(payload, now()),
                Err(CallbackError::InvalidSignature)
            );
        }
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = signed(unsigned());
        let other = CallbackValidator::new(SignatureEngine::new("not-the-secret"));
        assert_eq!(
            other.validate_at(payload, now()),
            Err(CallbackError::InvalidSignature)
        );
    }

    #[test]
    fn missing_signature_is_rejected() {
        let result = validator().validate_at(unsigned(), now());
        assert_eq!(result, Err(CallbackError::MissingSignature));
    }

    // ══════════════════════════════════════════════════════════════
    // Raw validation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn raw_body_is_verified_as_sent() {
        let body = sign_raw(serde_json::json!({
            "transactionId": "txn_9",
            "orderReference": "SUB-starter-u1-1704067100000",
            "status": "pending",
            "amount": 19.9,
            "currency": "BRL",
            "paymentMethod": "pix",
            "timestamp": "2024-01-01T00:00:00Z"
        }));

        let trusted = validator().validate_raw_at(&body, now()).unwrap();

        assert_eq!(trusted.status(), CallbackStatus::Pending);
        assert_eq!(trusted.payload().amount, Decimal::new(199, 1));
        assert_eq!(trusted.payload().currency, Currency::Brl);
    }

    #[test]
    fn raw_tampered_status_is_rejected() {
        let body = sign_raw(serde_json::json!({
            "transactionId": "txn_9",
            "orderReference": "SUB-pro-u1-1",
            "status": "rejected",
            "amount": "89.90",
            "currency": "BRL",
            "paymentMethod": "card",
            "timestamp": 1704067100
        }));
        let mut value: Value = serde_json::from_slice(&body).unwrap();
        value["status"] = Value::String("approved".to_string());
        let tampered = serde_json::to_vec(&value).unwrap();

        assert_eq!(
            validator().validate_raw_at(&tampered, now()),
            Err(CallbackError::InvalidSignature)
        );
    }

    #[test]
    fn raw_extra_fields_are_covered_by_signature() {
        let body = sign_raw(serde_json::json!({
            "transactionId": "txn_9",
            "orderReference": "SUB-pro-u1-1",
            "status": "approved",
            "amount": "89.90",
            "currency": "BRL",
            "paymentMethod": "card",
            "timestamp": 1704067100,
            "installments": 3
        }));
        let mut value: Value = serde_json::from_slice(&body).unwrap();
        value["installments"] = serde_json::json!(1);
        let tampered = serde_json::to_vec(&value).unwrap();

        assert!(validator().validate_raw_at(&body, now()).is_ok());
        assert_eq!(
            validator().validate_raw_at(&tampered, now()),
            Err(CallbackError::InvalidSignature)
        );
    }

    #[test]
    fn raw_invalid_json_is_parse_error() {
        let result = validator().validate_raw_at(b"not json", now());
        assert!(matches!(result, Err(CallbackError::ParseError(_))));
    }

    #[test]
    fn raw_non_object_is_parse_error() {
        let result = validator().validate_raw_at(b"[1,2]", now());
        assert!(matches!(result, Err(CallbackError::ParseError(_))));
    }

    #[test]
    fn raw_without_signature_is_rejected() {
        let body = serde_json::to_vec(&serde_json::json!({ "status": "approved" })).unwrap();
        assert_eq!(
            validator().validate_raw_at(&body, now()),
            Err(CallbackError::MissingSignature)
        );
    }

    #[test]
    fn raw_signed_but_incomplete_is_parse_error() {
        let body = sign_raw(serde_json::json!({
            "orderReference": "SUB-pro-u1-1",
            "status": "approved"
        }));
        let result = validator().validate_raw_at(&body, now());
        assert!(matches!(result, Err(CallbackError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Replay window
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn window_is_off_by_default() {
        let mut payload = unsigned();
        payload.timestamp = CallbackTimestamp::Unix(0);
        assert!(validator().validate_at(signed(payload), now()).is_ok());
    }

    #[test]
    fn callback_within_window_is_trusted() {
        let validator = validator().with_max_age_secs(300);
        assert!(validator.validate_at(signed(unsigned()), now()).is_ok());
    }

    #[test]
    fn callback_older_than_window_is_rejected() {
        let mut payload = unsigned();
        payload.timestamp = CallbackTimestamp::Unix(1_704_067_200 - 301);

        let result = validator()
            .with_max_age_secs(300)
            .validate_at(signed(payload), now());

        assert_eq!(result, Err(CallbackError::TimestampOutOfRange));
    }

    #[test]
    fn callback_at_window_boundary_is_trusted() {
        let mut payload = unsigned();
        payload.timestamp = CallbackTimestamp::Unix(1_704_067_200 - 300);

        let result = validator()
            .with_max_age_secs(300)
            .validate_at(signed(payload), now());

        assert!(result.is_ok());
    }

    #[test]
    fn callback_from_future_beyond_skew_is_rejected() {
        let mut payload = unsigned();
        payload.timestamp = CallbackTimestamp::Unix(1_704_067_200 + 120);

        let result = validator()
            .with_max_age_secs(300)
            .validate_at(signed(payload), now());

        assert_eq!(result, Err(CallbackError::InvalidTimestamp));
    }

    #[test]
    fn oversized_window_is_capped() {
        let mut payload = unsigned();
        payload.timestamp = CallbackTimestamp::Unix(1_704_067_200 - MAX_CALLBACK_AGE_SECS - 1);

        let result = validator()
            .with_max_age_secs(i64::MAX)
            .validate_at(signed(payload), now());

        assert_eq!(result, Err(CallbackError::TimestampOutOfRange));
    }

    #[test]
    fn unreadable_timestamp_fails_when_window_enabled() {
        let mut payload = unsigned();
        payload.timestamp = CallbackTimestamp::Text("soon".to_string());

        let result = validator()
            .with_max_age_secs(300)
            .validate_at(signed(payload), now());

        assert_eq!(result, Err(CallbackError::InvalidTimestamp));
    }
}
