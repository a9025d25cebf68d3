//! Subscription plan definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Subscription plan a customer can check out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    /// Trial access, activated locally without charging.
    FreeTrial,

    /// Entry plan, billed weekly.
    Starter,

    /// Monthly plan.
    Pro,

    /// Top monthly plan.
    Ultimate,
}

impl PlanType {
    /// All plans, in ascending order of price.
    pub const ALL: [PlanType; 4] = [
        PlanType::FreeTrial,
        PlanType::Starter,
        PlanType::Pro,
        PlanType::Ultimate,
    ];

    /// Wire identifier, as used in order references and requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::FreeTrial => "free_trial",
            PlanType::Starter => "starter",
            PlanType::Pro => "pro",
            PlanType::Ultimate => "ultimate",
        }
    }

    /// Returns true if checking out this plan charges the customer.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanType::FreeTrial)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanType::ALL
            .into_iter()
            .find(|plan| plan.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("plan_type", format!("unknown plan '{}'", s)))
    }
}

/// How often a plan is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingCycle {
    OneTime,
    Weekly,
    Monthly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::OneTime => "one-time",
            BillingCycle::Weekly => "weekly",
            BillingCycle::Monthly => "monthly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_free_trial_is_unpaid() {
        assert!(!PlanType::FreeTrial.is_paid());
        assert!(PlanType::Starter.is_paid());
        assert!(PlanType::Pro.is_paid());
        assert!(PlanType::Ultimate.is_paid());
    }

    #[test]
    fn plan_parses_from_wire_identifier() {
        assert_eq!("free_trial".parse::<PlanType>(), Ok(PlanType::FreeTrial));
        assert_eq!("ultimate".parse::<PlanType>(), Ok(PlanType::Ultimate));
    }

    #[test]
    fn unknown_plan_fails_to_parse() {
        assert!("not_a_real_plan".parse::<PlanType>().is_err());
        assert!("Pro".parse::<PlanType>().is_err());
    }

    #[test]
    fn plan_serializes_snake_case() {
        let json = serde_json::to_string(&PlanType::FreeTrial).unwrap();
        assert_eq!(json, "\"free_trial\"");
    }

    #[test]
    fn billing_cycle_serializes_kebab_case() {
        let json = serde_json::to_string(&BillingCycle::OneTime).unwrap();
        assert_eq!(json, "\"one-time\"");
        let cycle: BillingCycle = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(cycle, BillingCycle::Weekly);
    }
}
