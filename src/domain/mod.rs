//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, validation errors, state machines)
//! - `billing` - Plan pricing, request signing and callback verification
//!
//! Nothing in here performs I/O. Talking to the gateway happens behind the
//! `PaymentGateway` port.

pub mod billing;
pub mod foundation;
