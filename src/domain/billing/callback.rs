//! Payment-status callbacks sent by the gateway.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;
use super::order_reference::OrderReference;
use super::signature::{fields_from_serializable, FieldMap, SignatureError, SIGNATURE_FIELD};

/// Status reported by the gateway for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackStatus {
    Approved,
    Pending,
    Rejected,
    Cancelled,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStatus::Approved => "approved",
            CallbackStatus::Pending => "pending",
            CallbackStatus::Rejected => "rejected",
            CallbackStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further callbacks should change the outcome.
    pub fn is_final(&self) -> bool {
        !matches!(self, CallbackStatus::Pending)
    }
}

impl fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback timestamp as the gateway sent it.
///
/// Kept in its original JSON shape so the signed field set matches what the
/// gateway signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallbackTimestamp {
    /// Unix seconds.
    Unix(i64),
    /// RFC 3339 text, or unix seconds as a string.
    Text(String),
}

impl CallbackTimestamp {
    /// Interprets the timestamp, if it is in a recognised format.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CallbackTimestamp::Unix(secs) => Utc.timestamp_opt(*secs, 0).single(),
            CallbackTimestamp::Text(text) => {
                if let Ok(secs) = text.trim().parse::<i64>() {
                    return Utc.timestamp_opt(secs, 0).single();
                }
                DateTime::parse_from_rfc3339(text.trim())
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

/// Inbound callback body, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub transaction_id: String,
    pub order_reference: OrderReference,
    pub status: CallbackStatus,
    pub amount: Decimal,
    pub currency: Currency,
    pub payment_method: String,
    pub timestamp: CallbackTimestamp,
    #[serde(default)]
    pub signature: String,
}

impl CallbackPayload {
    /// Every field except `signature`, as signed by the gateway.
    pub fn signable_fields(&self) -> Result<FieldMap, SignatureError> {
        fields_from_serializable(self, &[SIGNATURE_FIELD])
    }
}
