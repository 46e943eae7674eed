use serde::{Deserialize, Serialize};

use super::advisory::AdvisoryStatus;

/// Lowest credit score accepted at the request boundary.
pub const MIN_CREDIT_SCORE: i32 = 300;
/// Highest credit score accepted at the request boundary.
pub const MAX_CREDIT_SCORE: i32 = 850;

/// Shopper-supplied inputs for a quote. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditProfile {
    pub credit_score: i32,
    pub monthly_income: f64,
    pub vehicle_price: f64,
}

impl CreditProfile {
    pub fn new(credit_score: i32, monthly_income: f64, vehicle_price: f64) -> Self {
        Self {
            credit_score,
            monthly_income,
            vehicle_price,
        }
    }

    /// Rejects inputs the pricing pipeline cannot handle before any math runs.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&self.credit_score) {
            return Err(InputError::CreditScoreOutOfRange(self.credit_score));
        }
        if !self.vehicle_price.is_finite() || self.vehicle_price <= 0.0 {
            return Err(InputError::NonPositivePrice(self.vehicle_price));
        }
        if !self.monthly_income.is_finite() || self.monthly_income < 0.0 {
            return Err(InputError::NegativeIncome(self.monthly_income));
        }
        Ok(())
    }

    pub fn tier(&self) -> CreditTier {
        CreditTier::from_score(self.credit_score)
    }
}

/// Client-facing validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("credit score {0} is outside the supported range 300-850")]
    CreditScoreOutOfRange(i32),
    #[error("vehicle price must be a positive amount (got {0})")]
    NonPositivePrice(f64),
    #[error("monthly income cannot be negative (got {0})")]
    NegativeIncome(f64),
}

/// Ordered risk buckets, lowest risk first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditTier {
    SuperPrime,
    Prime,
    NonPrime,
    SubPrime,
    DeepSubPrime,
}

impl CreditTier {
    pub const ALL: [CreditTier; 5] = [
        CreditTier::SuperPrime,
        CreditTier::Prime,
        CreditTier::NonPrime,
        CreditTier::SubPrime,
        CreditTier::DeepSubPrime,
    ];

    /// Total over the integer line; boundaries are inclusive on the upper tier.
    pub const fn from_score(score: i32) -> Self {
        if score >= 781 {
            CreditTier::SuperPrime
        } else if score >= 661 {
            CreditTier::Prime
        } else if score >= 601 {
            CreditTier::NonPrime
        } else if score >= 501 {
            CreditTier::SubPrime
        } else {
            CreditTier::DeepSubPrime
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditTier::SuperPrime => "Super Prime",
            CreditTier::Prime => "Prime",
            CreditTier::NonPrime => "Non-Prime",
            CreditTier::SubPrime => "Subprime",
            CreditTier::DeepSubPrime => "Deep Subprime",
        }
    }
}

/// Free-function form of [`CreditTier::from_score`].
pub fn classify(credit_score: i32) -> CreditTier {
    CreditTier::from_score(credit_score)
}

/// Reference rate for one tier as supplied by the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub tier: CreditTier,
    pub base_annual_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingKind {
    Loan,
    Lease,
}

impl FinancingKind {
    pub const fn label(self) -> &'static str {
        match self {
            FinancingKind::Loan => "loan",
            FinancingKind::Lease => "lease",
        }
    }
}

/// One row of the quote menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingOption {
    pub term_months: u32,
    pub annual_rate: f64,
    pub monthly_payment: f64,
    pub recommended: bool,
}

impl FinancingOption {
    /// Rounds at the output boundary: rate to 4 places, payment to 2.
    pub(crate) fn new(term_months: u32, annual_rate: f64, monthly_payment: f64) -> Self {
        Self {
            term_months,
            annual_rate: round_to(annual_rate, 4),
            monthly_payment: round_to(monthly_payment, 2),
            recommended: false,
        }
    }
}

/// Full menu for a profile, plus the affordability figures it was priced from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancingQuote {
    pub kind: FinancingKind,
    pub tier: CreditTier,
    pub down_payment: f64,
    pub loan_to_value: f64,
    pub options: Vec<FinancingOption>,
    pub recommended_term: Option<u32>,
    pub advisory: AdvisoryStatus,
}

impl FinancingQuote {
    pub fn terms(&self) -> impl Iterator<Item = u32> + '_ {
        self.options.iter().map(|option| option.term_months)
    }

    /// Marks `term_months` as recommended if it is one of the menu's terms.
    /// Returns false and leaves every entry untouched otherwise.
    pub fn apply_recommendation(&mut self, term_months: u32) -> bool {
        if !self.terms().any(|term| term == term_months) {
            return false;
        }

        for option in &mut self.options {
            option.recommended = option.term_months == term_months;
        }
        self.recommended_term = Some(term_months);
        true
    }

    pub fn recommended(&self) -> Option<&FinancingOption> {
        self.options.iter().find(|option| option.recommended)
    }
}

pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_partition_the_score_line() {
        let cases = [
            (i32::MIN, CreditTier::DeepSubPrime),
            (500, CreditTier::DeepSubPrime),
            (501, CreditTier::SubPrime),
            (600, CreditTier::SubPrime),
            (601, CreditTier::NonPrime),
            (660, CreditTier::NonPrime),
            (661, CreditTier::Prime),
            (780, CreditTier::Prime),
            (781, CreditTier::SuperPrime),
            (i32::MAX, CreditTier::SuperPrime),
        ];

        for (score, tier) in cases {
            assert_eq!(classify(score), tier, "score {score}");
        }
    }

    #[test]
    fn tiers_never_improve_as_score_drops() {
        let mut previous = classify(900);
        for score in (200..=900).rev() {
            let tier = classify(score);
            assert!(tier >= previous, "score {score} jumped to a safer tier");
            previous = tier;
        }
    }

    #[test]
    fn validate_rejects_out_of_domain_inputs() {
        assert_eq!(
            CreditProfile::new(299, 5000.0, 25000.0).validate(),
            Err(InputError::CreditScoreOutOfRange(299))
        );
        assert_eq!(
            CreditProfile::new(700, 5000.0, 0.0).validate(),
            Err(InputError::NonPositivePrice(0.0))
        );
        assert_eq!(
            CreditProfile::new(700, -1.0, 25000.0).validate(),
            Err(InputError::NegativeIncome(-1.0))
        );
        assert!(CreditProfile::new(700, 0.0, 25000.0).validate().is_ok());
        assert!(CreditProfile::new(700, 5000.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn rounding_happens_only_on_construction() {
        let option = FinancingOption::new(36, 0.056_549_9, 817.117_316);
        assert_eq!(option.annual_rate, 0.0565);
        assert_eq!(option.monthly_payment, 817.12);
        assert!(!option.recommended);
    }
}
