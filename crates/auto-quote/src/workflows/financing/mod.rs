//! Financing quote engine: credit tier, affordability, risk-adjusted rates and
//! the loan/lease menus priced from them.

pub mod advisory;
mod affordability;
pub mod config;
pub mod domain;
mod lease;
mod loan;
pub mod rates;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use advisory::{
    parse_recommended_term, AdvisoryError, AdvisoryGateway, AdvisoryStatus, HttpAdvisor,
    NoAdvisor,
};
pub use affordability::{Affordability, AffordabilityError, AffordabilityModel};
pub use config::{FinancingConfig, FinancingConfigError, ScheduleError, TermPosition, TermSchedule};
pub use domain::{
    classify, CreditProfile, CreditTier, FinancingKind, FinancingOption, FinancingQuote,
    InputError, RateEntry,
};
pub use lease::{money_factor, LeaseCalculator};
pub use loan::{amortized_payment, loan_options};
pub use rates::{RateCalculator, RateSheet, RateTable, RateTableError, TermRate};
pub use router::financing_router;
pub use service::{FinancingQuoteService, QuoteError};

/// Stateless pricing pipeline built from a validated configuration.
#[derive(Debug, Clone)]
pub struct FinancingEngine {
    schedule: TermSchedule,
    affordability: AffordabilityModel,
    rates: RateCalculator,
    lease: LeaseCalculator,
}

impl FinancingEngine {
    pub fn new(config: &FinancingConfig) -> Result<Self, ScheduleError> {
        Ok(Self {
            schedule: TermSchedule::from_config(config)?,
            affordability: AffordabilityModel::from_config(config),
            rates: RateCalculator::from_config(config),
            lease: LeaseCalculator::from_config(config),
        })
    }

    pub fn standard() -> Self {
        let config = FinancingConfig::default();
        Self {
            schedule: TermSchedule::standard(),
            affordability: AffordabilityModel::from_config(&config),
            rates: RateCalculator::from_config(&config),
            lease: LeaseCalculator::from_config(&config),
        }
    }

    pub fn schedule(&self) -> &TermSchedule {
        &self.schedule
    }

    /// Prices the full menu for `profile` from the tier's base rate.
    /// The profile is expected to have passed [`CreditProfile::validate`].
    pub fn price(
        &self,
        kind: FinancingKind,
        profile: &CreditProfile,
        base_rate: f64,
    ) -> Result<FinancingQuote, AffordabilityError> {
        let price = profile.vehicle_price;
        let affordability = self
            .affordability
            .compute_down_payment(price, profile.monthly_income)?;
        let rates_by_term =
            self.rates
                .rates_by_term(&self.schedule, base_rate, affordability.loan_to_value);

        let options = match kind {
            FinancingKind::Loan => loan_options(price, affordability.down_payment, &rates_by_term),
            FinancingKind::Lease => {
                self.lease
                    .lease_options(price, affordability.down_payment, &rates_by_term)
            }
        };

        Ok(FinancingQuote {
            kind,
            tier: profile.tier(),
            down_payment: domain::round_to(affordability.down_payment, 2),
            loan_to_value: domain::round_to(affordability.loan_to_value, 4),
            options,
            recommended_term: None,
            advisory: AdvisoryStatus::Skipped,
        })
    }
}
