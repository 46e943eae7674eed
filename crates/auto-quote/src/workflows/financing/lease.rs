use super::config::FinancingConfig;
use super::domain::FinancingOption;
use super::rates::TermRate;

/// Residual-value lease pricing with a flat acquisition fee capitalized into
/// the cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaseCalculator {
    acquisition_fee: f64,
}

impl Default for LeaseCalculator {
    fn default() -> Self {
        Self::from_config(&FinancingConfig::default())
    }
}

impl LeaseCalculator {
    pub fn new(acquisition_fee: f64) -> Self {
        Self { acquisition_fee }
    }

    pub fn from_config(config: &FinancingConfig) -> Self {
        Self::new(config.acquisition_fee)
    }

    pub fn acquisition_fee(&self) -> f64 {
        self.acquisition_fee
    }

    pub fn lease_options(
        &self,
        price: f64,
        down_payment: f64,
        rates_by_term: &[TermRate],
    ) -> Vec<FinancingOption> {
        let cap_cost = price - down_payment + self.acquisition_fee;

        rates_by_term
            .iter()
            .map(|rate| {
                let months = f64::from(rate.term.months);
                let residual_value = price * rate.term.residual_pct;
                let depreciation = (cap_cost - residual_value) / months;
                let finance = (cap_cost + residual_value) * money_factor(rate.annual_rate);
                FinancingOption::new(rate.term.months, rate.annual_rate, depreciation + finance)
            })
            .collect()
    }
}

/// Simplified dealer convention: APR / 2400 with APR expressed in percent.
pub fn money_factor(annual_rate: f64) -> f64 {
    annual_rate / 2400.0 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::financing::config::TermSchedule;
    use crate::workflows::financing::rates::RateCalculator;

    #[test]
    fn money_factor_matches_dealer_convention() {
        assert!((money_factor(0.054) - 0.00225).abs() < 1e-15);
        assert_eq!(money_factor(0.0), 0.0);
    }

    #[test]
    fn matches_reference_payments_for_prime_profile() {
        let rates = RateCalculator::default().rates_by_term(&TermSchedule::standard(), 0.049, 0.90);
        let options = LeaseCalculator::default().lease_options(30_000.0, 3_000.0, &rates);

        let payments: Vec<f64> = options.iter().map(|option| option.monthly_payment).collect();
        assert_eq!(payments, vec![410.2, 367.9, 351.85, 345.57, 337.96]);
        assert_eq!(options[4].annual_rate, 0.069);
    }

    #[test]
    fn zero_rate_lease_is_pure_depreciation() {
        let schedule = TermSchedule::standard();
        let rates = RateCalculator::new(0.8, 0.0).rates_by_term(&schedule, 0.0, 0.9);
        let first_rate = rates[0];
        assert_eq!(first_rate.annual_rate, 0.0);

        let calculator = LeaseCalculator::new(0.0);
        let options = calculator.lease_options(24_000.0, 0.0, &rates[..1]);
        let expected: f64 = (24_000.0 - 24_000.0 * 0.68) / 24.0;
        assert!((options[0].monthly_payment - (expected * 100.0).round() / 100.0).abs() < 1e-9);
    }
}
