//! Application handlers.
//!
//! Command handlers that orchestrate domain operations and ports.

pub mod checkout;

pub use checkout::{
    CheckoutResult, CreatePaymentRequestCommand, CreatePaymentRequestHandler,
    HandlePaymentCallbackHandler, PaymentStatusEvent,
};
