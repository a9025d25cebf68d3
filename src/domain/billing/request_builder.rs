//! Builds signed payment requests from a plan choice and customer identity.
//!
//! The builder is pure apart from reading the clock: it resolves the price,
//! generates the order reference, fills in merchant data and signs the result.
//! Dispatch to the gateway is the caller's job.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::catalog::{CatalogError, PlanCatalog, PlanEntry};
use super::currency::Currency;
use super::order_reference::OrderReference;
use super::payment_request::PaymentRequest;
use super::plan::PlanType;
use super::signature::{SignatureEngine, SignatureError};
use crate::domain::foundation::UserId;

/// Merchant data stamped onto every outbound request.
#[derive(Clone)]
pub struct MerchantProfile {
    pub merchant_name: String,
    pub merchant_key: SecretString,
    pub callback_url: String,
    pub return_url: String,
    pub cancel_url: String,
    pub order_prefix: String,
}

impl fmt::Debug for MerchantProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantProfile")
            .field("merchant_name", &self.merchant_name)
            .field("merchant_key", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .field("return_url", &self.return_url)
            .field("cancel_url", &self.cancel_url)
            .field("order_prefix", &self.order_prefix)
            .finish()
    }
}

/// Identity of the customer checking out, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCustomer {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}

/// What a checkout attempt turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Free trial: nothing to charge, nothing to sign.
    FreeTrialActivated,

    /// Paid plan: a signed request ready for the gateway.
    Payment(PaymentRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to sign payment request: {0}")]
    Signature(#[from] SignatureError),
}

pub struct PaymentRequestBuilder {
    catalog: Arc<PlanCatalog>,
    merchant: MerchantProfile,
    signer: SignatureEngine,
}

impl PaymentRequestBuilder {
    pub fn new(catalog: Arc<PlanCatalog>, merchant: MerchantProfile, signer: SignatureEngine) -> Self {
        Self {
            catalog,
            merchant,
            signer,
        }
    }

    /// Builds the request for a checkout started now.
    pub fn build(
        &self,
        plan: PlanType,
        currency: Currency,
        customer: &CheckoutCustomer,
    ) -> Result<BuildOutcome, BuildError> {
        self.build_at(plan, currency, customer, Utc::now())
    }

    /// Builds the request as if the checkout started at `now`.
    pub fn build_at(
        &self,
        plan: PlanType,
        currency: Currency,
        customer: &CheckoutCustomer,
        now: DateTime<Utc>,
    ) -> Result<BuildOutcome, BuildError> {
        if plan == PlanType::FreeTrial {
            tracing::info!(user_id = %customer.user_id, "Free trial activated without gateway call");
            return Ok(BuildOutcome::FreeTrialActivated);
        }

        let entry = self.catalog.resolve(plan, currency)?;
        let order_reference =
            OrderReference::generate(&self.merchant.order_prefix, plan, &customer.user_id, now);

        let request = PaymentRequest {
            merchant_key: self.merchant.merchant_key.expose_secret().clone(),
            merchant_name: self.merchant.merchant_name.clone(),
            amount: entry.amount,
            currency: entry.currency,
            order_reference,
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            customer_phone: customer.phone.clone().filter(|p| !p.trim().is_empty()),
            callback_url: self.merchant.callback_url.clone(),
            return_url: self.merchant.return_url.clone(),
            cancel_url: self.merchant.cancel_url.clone(),
            description: describe(entry),
            signature: String::new(),
        }
        .sign_with(&self.signer)?;

        tracing::debug!(
            order_reference = %request.order_reference,
            plan = %plan,
            currency = %currency,
            amount = %request.amount,
            "Built signed payment request"
        );

        Ok(BuildOutcome::Payment(request))
    }
}

fn describe(entry: &PlanEntry) -> String {
    format!("{} plan - {}", entry.name, entry.duration)
}
