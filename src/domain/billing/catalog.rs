//! Static plan price table.
//!
//! Resolves a `(plan, currency)` pair to the amount and display data sent to
//! the gateway. The catalog is immutable once built; the standard table is
//! shared process-wide behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::currency::Currency;
use super::plan::{BillingCycle, PlanType};

/// Price and display data for one plan in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub plan_type: PlanType,
    pub currency: Currency,
    pub amount: Decimal,
    pub name: String,
    pub duration: String,
    pub billing_cycle: BillingCycle,
}

impl PlanEntry {
    pub fn new(
        plan_type: PlanType,
        currency: Currency,
        amount: Decimal,
        name: impl Into<String>,
        duration: impl Into<String>,
        billing_cycle: BillingCycle,
    ) -> Self {
        Self {
            plan_type,
            currency,
            amount,
            name: name.into(),
            duration: duration.into(),
            billing_cycle,
        }
    }
}

/// Errors from building or querying a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("No price for plan '{plan}' in {currency}")]
    NotFound { plan: PlanType, currency: Currency },

    #[error("Duplicate price for plan '{plan}' in {currency}")]
    DuplicateEntry { plan: PlanType, currency: Currency },

    #[error("Plan '{plan}' in {currency} has a negative amount")]
    NegativeAmount { plan: PlanType, currency: Currency },

    #[error("Free trial in {currency} must cost zero")]
    FreeTrialNotFree { currency: Currency },
}

/// Read-only lookup of plan prices keyed by plan and currency.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    entries: HashMap<(PlanType, Currency), PlanEntry>,
}

static STANDARD: Lazy<Arc<PlanCatalog>> = Lazy::new(|| {
    Arc::new(PlanCatalog {
        entries: standard_entries()
            .into_iter()
            .map(|entry| ((entry.plan_type, entry.currency), entry))
            .collect(),
    })
});

impl PlanCatalog {
    /// The built-in price table (BRL primary, USD secondary).
    pub fn standard() -> Arc<PlanCatalog> {
        Arc::clone(&STANDARD)
    }

    /// Builds a catalog from arbitrary entries.
    ///
    /// Rejects duplicate `(plan, currency)` pairs, negative amounts and
    /// free trials with a non-zero price.
    pub fn from_entries(
        entries: impl IntoIterator<Item = PlanEntry>,
    ) -> Result<Self, CatalogError> {
        let mut table = HashMap::new();
        for entry in entries {
            let key = (entry.plan_type, entry.currency);
            if entry.amount < Decimal::ZERO {
                return Err(CatalogError::NegativeAmount {
                    plan: entry.plan_type,
                    currency: entry.currency,
                });
            }
            if entry.plan_type == PlanType::FreeTrial && !entry.amount.is_zero() {
                return Err(CatalogError::FreeTrialNotFree {
                    currency: entry.currency,
                });
            }
            if table.insert(key, entry).is_some() {
                return Err(CatalogError::DuplicateEntry {
                    plan: key.0,
                    currency: key.1,
                });
            }
        }
        Ok(Self { entries: table })
    }

    /// Looks up the price entry for a plan in a currency.
    pub fn resolve(&self, plan: PlanType, currency: Currency) -> Result<&PlanEntry, CatalogError> {
        self.entries
            .get(&(plan, currency))
            .ok_or(CatalogError::NotFound { plan, currency })
    }

    /// Currencies with at least one price.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.entries.keys().map(|(_, c)| *c).collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn standard_entries() -> Vec<PlanEntry> {
    use BillingCycle::*;
    use Currency::*;
    use PlanType::*;

    vec![
        PlanEntry::new(FreeTrial, Brl, Decimal::ZERO, "Free Trial", "7 days", OneTime),
        PlanEntry::new(Starter, Brl, Decimal::new(1990, 2), "Starter", "1 week", Weekly),
        PlanEntry::new(Pro, Brl, Decimal::new(8990, 2), "Pro", "1 month", Monthly),
        PlanEntry::new(Ultimate, Brl, Decimal::new(14990, 2), "Ultimate", "1 month", Monthly),
        // Approximate conversions, not tracked against live rates.
        PlanEntry::new(FreeTrial, Usd, Decimal::ZERO, "Free Trial", "7 days", OneTime),
        PlanEntry::new(Starter, Usd, Decimal::new(399, 2), "Starter", "1 week", Weekly),
        PlanEntry::new(Pro, Usd, Decimal::new(1799, 2), "Pro", "1 month", Monthly),
        PlanEntry::new(Ultimate, Usd, Decimal::new(2999, 2), "Ultimate", "1 month", Monthly),
    ]
}
