//! Lifecycle of a checkout transaction.

use serde::{Deserialize, Serialize};

use super::callback::CallbackStatus;
use super::callback_validator::TrustedCallback;
use crate::domain::foundation::{StateMachine, ValidationError};

/// Where a checkout transaction stands.
///
/// ```text
/// Initiated ──submit──▶ Pending ──callback──▶ Approved | Rejected | Cancelled
///     └──────free trial or callback──────────▶ Approved | Rejected | Cancelled
/// ```
///
/// Gateways may skip the pending notice, so a verified callback can settle an
/// initiated transaction directly. Pending notices may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Initiated,
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl TransactionStatus {
    /// The request reached the gateway and the customer was redirected.
    pub fn mark_submitted(self) -> Result<Self, ValidationError> {
        self.transition_to(TransactionStatus::Pending)
    }

    /// Free trials complete without a gateway round trip, so only a fresh
    /// transaction can be activated.
    pub fn activate_free_trial(self) -> Result<Self, ValidationError> {
        if self != TransactionStatus::Initiated {
            return Err(ValidationError::invalid_transition(self, TransactionStatus::Approved));
        }
        self.transition_to(TransactionStatus::Approved)
    }

    /// Applies the outcome of a verified callback.
    pub fn apply_callback(self, callback: &TrustedCallback) -> Result<Self, ValidationError> {
        self.transition_to(from_callback_status(callback.status()))
    }

    pub fn is_settled(&self) -> bool {
        self.is_terminal()
    }
}

// Only reachable through a verified callback.
fn from_callback_status(status: CallbackStatus) -> TransactionStatus {
    match status {
        CallbackStatus::Approved => TransactionStatus::Approved,
        CallbackStatus::Pending => TransactionStatus::Pending,
        CallbackStatus::Rejected => TransactionStatus::Rejected,
        CallbackStatus::Cancelled => TransactionStatus::Cancelled,
    }
}

impl StateMachine for TransactionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TransactionStatus::*;
        match self {
            Initiated => vec![Pending, Approved, Rejected, Cancelled],
            Pending => vec![Pending, Approved, Rejected, Cancelled],
            Approved | Rejected | Cancelled => vec![],
        }
    }
}
