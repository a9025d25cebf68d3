//! Canonical field signing with HMAC-SHA256.
//!
//! Both outbound payment requests and inbound gateway callbacks are signed the
//! same way: the fields are sorted by key (byte-wise), joined as
//! `key=value` pairs separated by `&`, and the resulting string is signed with
//! the shared merchant secret. The signature travels as lowercase hex.
//!
//! # Security
//!
//! - Verification compares MACs with `subtle::ConstantTimeEq`
//! - The secret is held in a `secrecy::SecretString` and never printed
//! - Values are not escaped; `=` or `&` inside a value can make two different
//!   field sets canonicalize identically. The gateway defines this format, so
//!   it is kept as-is.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Field set to sign, ordered by key.
pub type FieldMap = BTreeMap<String, String>;

/// Name of the field that carries the signature on the wire.
pub const SIGNATURE_FIELD: &str = "signature";

/// Errors turning a structured value into a signable field set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Field '{0}' is not a scalar value")]
    NonScalarField(String),

    #[error("Signable value must be a JSON object")]
    NotAnObject,

    #[error("Failed to serialize signable value: {0}")]
    Serialization(String),
}

/// Serializes fields into the canonical `k1=v1&k2=v2` form.
///
/// Keys are sorted ascending by their bytes, so the output does not depend on
/// the iteration order of the input.
pub fn canonicalize<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = fields.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().as_bytes().cmp(b.0.as_ref().as_bytes()));

    let mut canonical = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            canonical.push('&');
        }
        canonical.push_str(key.as_ref());
        canonical.push('=');
        canonical.push_str(value.as_ref());
    }
    canonical
}

/// Extracts the signable fields from a JSON object.
///
/// Strings are used verbatim, numbers keep their JSON text and booleans become
/// `true`/`false`. Null fields are omitted, as are the keys in `exclude`.
pub fn fields_from_json(object: &Map<String, Value>, exclude: &[&str]) -> Result<FieldMap, SignatureError> {
    let mut fields = FieldMap::new();
    for (key, value) in object {
        if exclude.contains(&key.as_str()) {
            continue;
        }
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(SignatureError::NonScalarField(key.clone()))
            }
        };
        fields.insert(key.clone(), text);
    }
    Ok(fields)
}

/// Extracts the signable fields from any value serializing to a JSON object.
pub fn fields_from_serializable<T: Serialize>(value: &T, exclude: &[&str]) -> Result<FieldMap, SignatureError> {
    match serde_json::to_value(value).map_err(|e| SignatureError::Serialization(e.to_string()))? {
        Value::Object(object) => fields_from_json(&object, exclude),
        _ => Err(SignatureError::NotAnObject),
    }
}

/// Signs and verifies canonical field sets with the shared merchant secret.
#[derive(Clone)]
pub struct SignatureEngine {
    secret: SecretString,
}

impl SignatureEngine {
    /// Creates an engine keyed by `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Creates an engine from an already-wrapped secret.
    pub fn from_secret(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Returns the lowercase hex HMAC-SHA256 of the canonical field string.
    pub fn sign<I, K, V>(&self, fields: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        hex::encode(self.mac(&canonicalize(fields)))
    }

    /// Recomputes the signature and compares it with `candidate`.
    ///
    /// The candidate is hex-decoded (either case); malformed hex or a
    /// length mismatch is a failed verification, not an error.
    pub fn verify<I, K, V>(&self, fields: I, candidate: &str) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let Ok(provided) = hex::decode(candidate.trim()) else {
            return false;
        };
        let expected = self.mac(&canonicalize(fields));
        constant_time_compare(&expected, &provided)
    }

    fn mac(&self, message: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
