//! Billing domain.
//!
//! Plan pricing, request signing, order references, checkout request
//! assembly and verification of gateway callbacks.

mod callback;
mod callback_errors;
mod callback_validator;
mod catalog;
mod currency;
mod order_reference;
mod payment_request;
mod plan;
mod request_builder;
mod signature;
mod transaction_status;

pub use callback::{CallbackPayload, CallbackStatus, CallbackTimestamp};
pub use callback_errors::CallbackError;
pub use callback_validator::{CallbackValidator, TrustedCallback, MAX_CALLBACK_AGE_SECS};
pub use catalog::{CatalogError, PlanCatalog, PlanEntry};
pub use currency::Currency;
pub use order_reference::OrderReference;
pub use payment_request::PaymentRequest;
pub use plan::{BillingCycle, PlanType};
pub use request_builder::{
    BuildError, BuildOutcome, CheckoutCustomer, MerchantProfile, PaymentRequestBuilder,
};
pub use signature::{
    canonicalize, fields_from_json, fields_from_serializable, FieldMap, SignatureEngine,
    SignatureError, SIGNATURE_FIELD,
};
pub use transaction_status::TransactionStatus;
