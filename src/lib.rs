//! Plan Checkout - subscription plan pricing and payment gateway integration
//!
//! Resolves plan prices, builds HMAC-signed checkout requests for an external
//! payment gateway, submits them, and verifies the gateway's signed status
//! callbacks before anything acts on them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
