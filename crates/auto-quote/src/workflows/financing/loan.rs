use super::domain::FinancingOption;
use super::rates::TermRate;

/// Standard amortizing payment scaled by the term's fee multiplier.
/// A zero periodic rate falls back to the straight-line limit `pv / n`.
pub fn amortized_payment(
    principal: f64,
    annual_rate: f64,
    months: u32,
    fee_multiplier: f64,
) -> f64 {
    let n = f64::from(months);
    let r = annual_rate / 12.0;
    // 1 - (1 + r)^-n, kept accurate when r is tiny.
    let discount = -(-n * r.ln_1p()).exp_m1();

    let base = if r == 0.0 || discount == 0.0 {
        principal / n
    } else {
        (principal * r) / discount
    };

    base * fee_multiplier
}

/// Loan menu, one option per term in schedule order.
pub fn loan_options(
    price: f64,
    down_payment: f64,
    rates_by_term: &[TermRate],
) -> Vec<FinancingOption> {
    let principal = price - down_payment;

    rates_by_term
        .iter()
        .map(|rate| {
            let payment = amortized_payment(
                principal,
                rate.annual_rate,
                rate.term.months,
                rate.term.fee_multiplier,
            );
            FinancingOption::new(rate.term.months, rate.annual_rate, payment)
        })
        .collect()
}
