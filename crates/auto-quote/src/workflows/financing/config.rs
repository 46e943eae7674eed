use std::path::Path;

use serde::{Deserialize, Serialize};

/// Pricing constants for the quote engine. Loaded once and shared read-only.
///
/// `terms`, `apr_premiums`, `fee_multipliers` and `residual_percentages` are
/// parallel arrays indexed by term position; [`TermSchedule::from_config`]
/// refuses any configuration where they disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingConfig {
    pub terms: Vec<u32>,
    pub apr_premiums: Vec<f64>,
    pub fee_multipliers: Vec<f64>,
    pub residual_percentages: Vec<f64>,
    pub acquisition_fee: f64,
    pub down_payment_price_ratio: f64,
    pub down_payment_income_ratio: f64,
    pub ltv_benchmark: f64,
    pub ltv_rate_slope: f64,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            terms: vec![24, 36, 48, 60, 72],
            apr_premiums: vec![0.0, 0.0025, 0.0025, 0.005, 0.005],
            fee_multipliers: vec![1.0, 1.0, 1.005, 1.01, 1.015],
            residual_percentages: vec![0.68, 0.61, 0.53, 0.45, 0.38],
            acquisition_fee: 650.0,
            down_payment_price_ratio: 0.10,
            down_payment_income_ratio: 0.05,
            ltv_benchmark: 0.80,
            ltv_rate_slope: 0.05,
        }
    }
}

impl FinancingConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FinancingConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: FinancingConfig = serde_json::from_str(&raw)?;
        TermSchedule::from_config(&config)?;
        Ok(config)
    }
}

/// Constants attached to one position of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermPosition {
    pub months: u32,
    pub apr_premium: f64,
    pub fee_multiplier: f64,
    pub residual_pct: f64,
}

/// Validated, increasing list of term positions.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSchedule {
    positions: Vec<TermPosition>,
}

impl TermSchedule {
    /// The 24–72 month schedule from [`FinancingConfig::default`].
    pub fn standard() -> Self {
        let config = FinancingConfig::default();
        let positions = config
            .terms
            .iter()
            .zip(&config.apr_premiums)
            .zip(&config.fee_multipliers)
            .zip(&config.residual_percentages)
            .map(|(((months, apr_premium), fee_multiplier), residual_pct)| TermPosition {
                months: *months,
                apr_premium: *apr_premium,
                fee_multiplier: *fee_multiplier,
                residual_pct: *residual_pct,
            })
            .collect();
        Self { positions }
    }

    pub fn from_config(config: &FinancingConfig) -> Result<Self, ScheduleError> {
        let expected = config.terms.len();
        if expected == 0 {
            return Err(ScheduleError::Empty);
        }

        for (field, found) in [
            ("apr_premiums", config.apr_premiums.len()),
            ("fee_multipliers", config.fee_multipliers.len()),
            ("residual_percentages", config.residual_percentages.len()),
        ] {
            if found != expected {
                return Err(ScheduleError::LengthMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }

        if !config.acquisition_fee.is_finite() || config.acquisition_fee < 0.0 {
            return Err(ScheduleError::InvalidAcquisitionFee(config.acquisition_fee));
        }

        let mut positions = Vec::with_capacity(expected);
        let mut previous: Option<u32> = None;
        for index in 0..expected {
            let position = TermPosition {
                months: config.terms[index],
                apr_premium: config.apr_premiums[index],
                fee_multiplier: config.fee_multipliers[index],
                residual_pct: config.residual_percentages[index],
            };

            if position.months == 0 || previous.is_some_and(|prior| position.months <= prior) {
                return Err(ScheduleError::NonIncreasingTerm {
                    previous: previous.unwrap_or(0),
                    found: position.months,
                });
            }
            if !position.apr_premium.is_finite() || position.apr_premium < 0.0 {
                return Err(ScheduleError::NegativePremium {
                    term: position.months,
                    premium: position.apr_premium,
                });
            }
            if !position.fee_multiplier.is_finite() || position.fee_multiplier <= 0.0 {
                return Err(ScheduleError::InvalidFeeMultiplier {
                    term: position.months,
                    value: position.fee_multiplier,
                });
            }
            if !(position.residual_pct > 0.0 && position.residual_pct < 1.0) {
                return Err(ScheduleError::InvalidResidual {
                    term: position.months,
                    value: position.residual_pct,
                });
            }

            previous = Some(position.months);
            positions.push(position);
        }

        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[TermPosition] {
        &self.positions
    }

    pub fn terms(&self) -> impl Iterator<Item = u32> + '_ {
        self.positions.iter().map(|position| position.months)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("term schedule must list at least one term")]
    Empty,
    #[error("{field} has {found} entries but the schedule lists {expected} terms")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("terms must be positive and strictly increasing ({found} follows {previous})")]
    NonIncreasingTerm { previous: u32, found: u32 },
    #[error("APR premium for {term} months must be non-negative (got {premium})")]
    NegativePremium { term: u32, premium: f64 },
    #[error("fee multiplier for {term} months must be positive (got {value})")]
    InvalidFeeMultiplier { term: u32, value: f64 },
    #[error("residual percentage for {term} months must be between 0 and 1 (got {value})")]
    InvalidResidual { term: u32, value: f64 },
    #[error("acquisition fee must be a non-negative amount (got {0})")]
    InvalidAcquisitionFee(f64),
}

#[derive(Debug, thiserror::Error)]
pub enum FinancingConfigError {
    #[error("failed to read financing config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid financing config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid term schedule: {0}")]
    Schedule(#[from] ScheduleError),
}
