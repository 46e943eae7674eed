use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::advisory::{AdvisoryGateway, AdvisoryStatus};
use super::affordability::AffordabilityError;
use super::domain::{CreditProfile, FinancingKind, FinancingQuote, InputError};
use super::rates::{RateTable, RateTableError};
use super::FinancingEngine;

/// Service composing the rate table, pricing engine and advisory port.
pub struct FinancingQuoteService<T, A> {
    engine: Arc<FinancingEngine>,
    rates: Arc<T>,
    advisor: Arc<A>,
    advisory_timeout: Duration,
}

impl<T, A> FinancingQuoteService<T, A>
where
    T: RateTable + 'static,
    A: AdvisoryGateway + 'static,
{
    pub fn new(
        engine: FinancingEngine,
        rates: Arc<T>,
        advisor: Arc<A>,
        advisory_timeout: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            rates,
            advisor,
            advisory_timeout,
        }
    }

    pub fn engine(&self) -> &FinancingEngine {
        &self.engine
    }

    /// Validate, classify and price the menu without consulting the advisor.
    pub fn menu(
        &self,
        kind: FinancingKind,
        profile: &CreditProfile,
    ) -> Result<FinancingQuote, QuoteError> {
        profile.validate()?;

        let tier = profile.tier();
        let base_rate = self.rates.base_rate(tier)?;
        let quote = self.engine.price(kind, profile, base_rate)?;

        debug!(
            kind = kind.label(),
            tier = tier.label(),
            base_rate,
            down_payment = quote.down_payment,
            loan_to_value = quote.loan_to_value,
            "priced financing menu"
        );

        Ok(quote)
    }

    /// Price the menu, then ask the advisor for a term. Advisor failures never
    /// fail the request; they are reported through [`FinancingQuote::advisory`].
    pub async fn quote(
        &self,
        kind: FinancingKind,
        profile: CreditProfile,
    ) -> Result<FinancingQuote, QuoteError> {
        let mut quote = self.menu(kind, &profile)?;
        quote.advisory = self.consult_advisor(&mut quote, &profile).await;

        info!(
            kind = kind.label(),
            options = quote.options.len(),
            recommended = ?quote.recommended_term,
            advisory = quote.advisory.label(),
            "financing quote ready"
        );

        Ok(quote)
    }

    async fn consult_advisor(
        &self,
        quote: &mut FinancingQuote,
        profile: &CreditProfile,
    ) -> AdvisoryStatus {
        let outcome = tokio::time::timeout(
            self.advisory_timeout,
            self.advisor.recommend(&quote.options, profile),
        )
        .await;

        match outcome {
            Err(_) => {
                warn!(
                    timeout_ms = self.advisory_timeout.as_millis() as u64,
                    "advisor timed out; returning menu without a recommendation"
                );
                AdvisoryStatus::TimedOut
            }
            Ok(Err(err)) => {
                warn!(error = %err, "advisor failed; returning menu without a recommendation");
                AdvisoryStatus::Unavailable
            }
            Ok(Ok(None)) => AdvisoryStatus::NoOpinion,
            Ok(Ok(Some(term))) => {
                if quote.apply_recommendation(term) {
                    AdvisoryStatus::Accepted
                } else {
                    warn!(term, "advisor recommended a term that is not on the menu");
                    AdvisoryStatus::Rejected
                }
            }
        }
    }
}

/// Error raised by the financing service.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    RateTable(#[from] RateTableError),
    #[error(transparent)]
    Affordability(#[from] AffordabilityError),
}
