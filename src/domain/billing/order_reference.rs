//! Order references correlating a checkout with its callbacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::plan::PlanType;
use crate::domain::foundation::UserId;

/// Merchant-side identifier of one checkout attempt.
///
/// Generated as `{prefix}-{plan}-{userId}-{unixMillis}`. Two attempts by the
/// same user for the same plan within one millisecond collide; deduplication
/// belongs to whoever persists the reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    pub fn generate(prefix: &str, plan: PlanType, user_id: &UserId, at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            prefix,
            plan.as_str(),
            user_id,
            at.timestamp_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generate_joins_prefix_plan_user_and_millis() {
        let at = Utc.timestamp_millis_opt(1_704_067_200_123).unwrap();
        let user = UserId::new("u42").unwrap();

        let reference = OrderReference::generate("SUB", PlanType::Pro, &user, at);

        assert_eq!(reference.as_str(), "SUB-pro-u42-1704067200123");
    }

    #[test]
    fn references_differ_across_milliseconds() {
        let user = UserId::new("u42").unwrap();
        let first = Utc.timestamp_millis_opt(1_000).unwrap();
        let second = Utc.timestamp_millis_opt(1_001).unwrap();

        assert_ne!(
            OrderReference::generate("SUB", PlanType::Starter, &user, first),
            OrderReference::generate("SUB", PlanType::Starter, &user, second)
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let reference = OrderReference::from("SUB-pro-u1-5".to_string());
        assert_eq!(serde_json::to_string(&reference).unwrap(), "\"SUB-pro-u1-5\"");
    }
}
