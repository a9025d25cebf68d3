//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::billing::{
    Currency, MerchantProfile, SignatureEngine, MAX_CALLBACK_AGE_SECS,
};

/// Payment configuration (merchant identity and gateway access)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Merchant display name sent with every request
    pub merchant_name: String,

    /// Merchant key issued by the gateway
    pub merchant_key: SecretString,

    /// Shared secret for request and callback signatures
    pub signing_secret: SecretString,

    /// Gateway base URL
    pub gateway_host: String,

    /// Where the gateway posts status callbacks
    pub callback_url: String,

    /// Where the customer lands after paying
    pub return_url: String,

    /// Where the customer lands after abandoning payment
    pub cancel_url: String,

    /// Gateway call timeout in seconds
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,

    /// Order reference prefix
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,

    /// Currency used when a checkout names none
    #[serde(default)]
    pub default_currency: Currency,

    /// Reject callbacks older than this many seconds (disabled when unset)
    pub callback_max_age_secs: Option<i64>,
}

impl PaymentConfig {
    /// Merchant data stamped onto outbound requests
    pub fn merchant_profile(&self) -> MerchantProfile {
        MerchantProfile {
            merchant_name: self.merchant_name.clone(),
            merchant_key: self.merchant_key.clone(),
            callback_url: self.callback_url.clone(),
            return_url: self.return_url.clone(),
            cancel_url: self.cancel_url.clone(),
            order_prefix: self.order_prefix.clone(),
        }
    }

    pub fn signature_engine(&self) -> SignatureEngine {
        SignatureEngine::from_secret(self.signing_secret.clone())
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.merchant_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__MERCHANT_NAME"));
        }
        if self.merchant_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__MERCHANT_KEY"));
        }
        if self.signing_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__SIGNING_SECRET"));
        }

        for (name, url) in [
            ("PAYMENT__GATEWAY_HOST", &self.gateway_host),
            ("PAYMENT__CALLBACK_URL", &self.callback_url),
            ("PAYMENT__RETURN_URL", &self.return_url),
            ("PAYMENT__CANCEL_URL", &self.cancel_url),
        ] {
            check_url(name, url, production)?;
        }

        if self.gateway_timeout_secs == 0 || self.gateway_timeout_secs > 120 {
            return Err(ValidationError::InvalidGatewayTimeout);
        }
        if self.order_prefix.is_empty()
            || !self.order_prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ValidationError::InvalidOrderPrefix);
        }
        if matches!(
            self.callback_max_age_secs,
            Some(secs) if secs <= 0 || secs > MAX_CALLBACK_AGE_SECS
        ) {
            return Err(ValidationError::InvalidCallbackWindow);
        }

        Ok(())
    }
}

fn check_url(name: &'static str, url: &str, production: bool) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidUrl(name));
    }
    if production && !url.starts_with("https://") {
        return Err(ValidationError::UrlMustBeHttps(name));
    }
    Ok(())
}

fn default_gateway_timeout() -> u64 {
    30
}

fn default_order_prefix() -> String {
    "SUB".to_string()
}
