use serde::Serialize;

use super::config::FinancingConfig;

/// Down payment heuristic: the smaller of a price-relative and an
/// income-relative ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordabilityModel {
    price_ratio: f64,
    annual_income_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affordability {
    pub down_payment: f64,
    pub loan_to_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum AffordabilityError {
    #[error("loan-to-value is undefined for a vehicle price of {0}")]
    NonPositivePrice(f64),
}

impl Default for AffordabilityModel {
    fn default() -> Self {
        Self::from_config(&FinancingConfig::default())
    }
}

impl AffordabilityModel {
    pub fn new(price_ratio: f64, annual_income_ratio: f64) -> Self {
        Self {
            price_ratio,
            annual_income_ratio,
        }
    }

    pub fn from_config(config: &FinancingConfig) -> Self {
        Self::new(
            config.down_payment_price_ratio,
            config.down_payment_income_ratio,
        )
    }

    pub fn compute_down_payment(
        &self,
        price: f64,
        monthly_income: f64,
    ) -> Result<Affordability, AffordabilityError> {
        if price.is_nan() || price <= 0.0 {
            return Err(AffordabilityError::NonPositivePrice(price));
        }

        let price_cap = price * self.price_ratio;
        let income_cap = monthly_income * 12.0 * self.annual_income_ratio;
        let down_payment = price_cap.min(income_cap).max(0.0);

        Ok(Affordability {
            down_payment,
            loan_to_value: (price - down_payment) / price,
        })
    }
}
