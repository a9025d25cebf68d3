//! Signed payment-initiation request sent to the gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;
use super::order_reference::OrderReference;
use super::signature::{fields_from_serializable, FieldMap, SignatureEngine, SignatureError, SIGNATURE_FIELD};

/// Checkout request body, serialized camelCase.
///
/// `signature` covers every other field; an absent `customerPhone` is left
/// out of both the JSON body and the signed field set.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub merchant_key: String,
    pub merchant_name: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub order_reference: OrderReference,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub callback_url: String,
    pub return_url: String,
    pub cancel_url: String,
    pub description: String,
    #[serde(default)]
    pub signature: String,
}

impl PaymentRequest {
    /// Every field except `signature`, as signed.
    pub fn signable_fields(&self) -> Result<FieldMap, SignatureError> {
        fields_from_serializable(self, &[SIGNATURE_FIELD])
    }

    /// Computes and stores the signature over the other fields.
    pub(crate) fn sign_with(mut self, engine: &SignatureEngine) -> Result<Self, SignatureError> {
        let fields = self.signable_fields()?;
        self.signature = engine.sign(&fields);
        Ok(self)
    }

    /// Returns true if `signature` matches the current field values.
    pub fn has_valid_signature(&self, engine: &SignatureEngine) -> bool {
        match self.signable_fields() {
            Ok(fields) => engine.verify(&fields, &self.signature),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("merchant_key", &"[REDACTED]")
            .field("merchant_name", &self.merchant_name)
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("order_reference", &self.order_reference)
            .field("customer_name", &self.customer_name)
            .field("customer_email", &self.customer_email)
            .field("customer_phone", &self.customer_phone)
            .field("callback_url", &self.callback_url)
            .field("return_url", &self.return_url)
            .field("cancel_url", &self.cancel_url)
            .field("description", &self.description)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}
