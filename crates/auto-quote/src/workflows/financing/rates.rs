use std::collections::BTreeMap;

use super::config::{FinancingConfig, TermPosition, TermSchedule};
use super::domain::{CreditTier, RateEntry};

/// Source of base annual rates per tier (a persisted reference table in production).
pub trait RateTable: Send + Sync {
    fn base_rate(&self, tier: CreditTier) -> Result<f64, RateTableError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateTableError {
    #[error("rate table has no entry for tier {0:?}")]
    NotFound(CreditTier),
    #[error("rate table lists tier {0:?} more than once")]
    DuplicateTier(CreditTier),
    #[error("rate for tier {tier:?} is not a finite number ({rate})")]
    InvalidRate { tier: CreditTier, rate: f64 },
    #[error("rate table unavailable: {0}")]
    Unavailable(String),
}

/// In-process rate table holding exactly one entry per tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSheet {
    rates: BTreeMap<CreditTier, f64>,
}

impl RateSheet {
    pub fn from_entries<I>(entries: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = RateEntry>,
    {
        let mut rates = BTreeMap::new();
        for entry in entries {
            if !entry.base_annual_rate.is_finite() {
                return Err(RateTableError::InvalidRate {
                    tier: entry.tier,
                    rate: entry.base_annual_rate,
                });
            }
            if rates.insert(entry.tier, entry.base_annual_rate).is_some() {
                return Err(RateTableError::DuplicateTier(entry.tier));
            }
        }

        if let Some(missing) = CreditTier::ALL
            .iter()
            .find(|tier| !rates.contains_key(tier))
        {
            return Err(RateTableError::NotFound(*missing));
        }

        Ok(Self { rates })
    }

    pub fn entries(&self) -> Vec<RateEntry> {
        self.rates
            .iter()
            .map(|(tier, rate)| RateEntry {
                tier: *tier,
                base_annual_rate: *rate,
            })
            .collect()
    }
}

impl RateTable for RateSheet {
    fn base_rate(&self, tier: CreditTier) -> Result<f64, RateTableError> {
        self.rates
            .get(&tier)
            .copied()
            .ok_or(RateTableError::NotFound(tier))
    }
}

/// Final annual rate for one schedule position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermRate {
    pub term: TermPosition,
    pub annual_rate: f64,
}

/// Adjusts a tier's base rate by loan-to-value and by term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCalculator {
    ltv_benchmark: f64,
    ltv_slope: f64,
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self::from_config(&FinancingConfig::default())
    }
}

impl RateCalculator {
    pub fn new(ltv_benchmark: f64, ltv_slope: f64) -> Self {
        Self {
            ltv_benchmark,
            ltv_slope,
        }
    }

    pub fn from_config(config: &FinancingConfig) -> Self {
        Self::new(config.ltv_benchmark, config.ltv_rate_slope)
    }

    /// Not clamped: a very low loan-to-value can push this below zero.
    pub fn ltv_adjusted_rate(&self, base_rate: f64, loan_to_value: f64) -> f64 {
        base_rate + self.ltv_slope * (loan_to_value - self.ltv_benchmark)
    }

    /// Premiums accumulate: each term's rate carries every shorter term's premium.
    pub fn rates_by_term(
        &self,
        schedule: &TermSchedule,
        base_rate: f64,
        loan_to_value: f64,
    ) -> Vec<TermRate> {
        let mut running = self.ltv_adjusted_rate(base_rate, loan_to_value);
        schedule
            .positions()
            .iter()
            .map(|term| {
                running += term.apr_premium;
                TermRate {
                    term: *term,
                    annual_rate: running,
                }
            })
            .collect()
    }
}
