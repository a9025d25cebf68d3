//! Checkout command handlers.

mod create_payment_request;
mod handle_payment_callback;

pub use create_payment_request::{
    CheckoutResult, CreatePaymentRequestCommand, CreatePaymentRequestHandler, FREE_TRIAL_MESSAGE,
    REDIRECT_MESSAGE,
};
pub use handle_payment_callback::{HandlePaymentCallbackHandler, PaymentStatusEvent};
