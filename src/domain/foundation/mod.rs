//! Foundation module - shared domain primitives.
//!
//! Identifier value objects, validation errors and the state machine trait
//! used by the billing lifecycle.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::UserId;
pub use state_machine::StateMachine;
