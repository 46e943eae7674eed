use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::financing::{
    AdvisoryError, AdvisoryGateway, CreditProfile, CreditTier, FinancingEngine, FinancingOption,
    FinancingQuoteService, NoAdvisor, RateEntry, RateSheet, RateTable, RateTableError,
};

pub(super) const ADVISORY_TIMEOUT: Duration = Duration::from_millis(200);

pub(super) fn reference_profile() -> CreditProfile {
    CreditProfile::new(750, 6000.0, 30000.0)
}

pub(super) fn rate_sheet() -> RateSheet {
    RateSheet::from_entries([
        RateEntry {
            tier: CreditTier::SuperPrime,
            base_annual_rate: 0.0384,
        },
        RateEntry {
            tier: CreditTier::Prime,
            base_annual_rate: 0.049,
        },
        RateEntry {
            tier: CreditTier::NonPrime,
            base_annual_rate: 0.0725,
        },
        RateEntry {
            tier: CreditTier::SubPrime,
            base_annual_rate: 0.1011,
        },
        RateEntry {
            tier: CreditTier::DeepSubPrime,
            base_annual_rate: 0.1293,
        },
    ])
    .expect("standard sheet is complete")
}

pub(super) fn build_service<A>(advisor: A) -> FinancingQuoteService<RateSheet, A>
where
    A: AdvisoryGateway + 'static,
{
    FinancingQuoteService::new(
        FinancingEngine::standard(),
        Arc::new(rate_sheet()),
        Arc::new(advisor),
        ADVISORY_TIMEOUT,
    )
}

pub(super) fn quiet_service() -> FinancingQuoteService<RateSheet, NoAdvisor> {
    build_service(NoAdvisor)
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

/// Always recommends the same term and counts how often it was asked.
#[derive(Default)]
pub(super) struct FixedAdvisor {
    term: u32,
    calls: AtomicUsize,
}

impl FixedAdvisor {
    pub(super) fn new(term: u32) -> Self {
        Self {
            term,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisoryGateway for FixedAdvisor {
    async fn recommend(
        &self,
        _menu: &[FinancingOption],
        _profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.term))
    }
}

pub(super) struct FailingAdvisor;

#[async_trait]
impl AdvisoryGateway for FailingAdvisor {
    async fn recommend(
        &self,
        _menu: &[FinancingOption],
        _profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError> {
        Err(AdvisoryError::Transport("connection refused".to_string()))
    }
}

pub(super) struct SlowAdvisor;

#[async_trait]
impl AdvisoryGateway for SlowAdvisor {
    async fn recommend(
        &self,
        menu: &[FinancingOption],
        _profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError> {
        tokio::time::sleep(ADVISORY_TIMEOUT * 10).await;
        Ok(menu.first().map(|option| option.term_months))
    }
}

pub(super) struct UnavailableRates;

impl RateTable for UnavailableRates {
    fn base_rate(&self, _tier: CreditTier) -> Result<f64, RateTableError> {
        Err(RateTableError::Unavailable("rate store offline".to_string()))
    }
}

pub(super) struct MissingTierRates;

impl RateTable for MissingTierRates {
    fn base_rate(&self, tier: CreditTier) -> Result<f64, RateTableError> {
        Err(RateTableError::NotFound(tier))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
