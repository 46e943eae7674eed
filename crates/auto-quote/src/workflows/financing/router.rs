use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::advisory::{AdvisoryGateway, AdvisoryStatus};
use super::domain::{
    CreditProfile, CreditTier, FinancingKind, FinancingOption, FinancingQuote, InputError,
};
use super::rates::{RateTable, RateTableError};
use super::service::{FinancingQuoteService, QuoteError};

/// Inbound quote request. Fields are optional here so a missing value is
/// reported as a validation error instead of a bare deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancingRequest {
    #[serde(default)]
    pub credit_score: Option<i32>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub vehicle_price: Option<f64>,
}

impl FinancingRequest {
    pub fn into_profile(self) -> Result<CreditProfile, InputError> {
        Ok(CreditProfile::new(
            self.credit_score
                .ok_or(InputError::MissingField("credit_score"))?,
            self.monthly_income
                .ok_or(InputError::MissingField("monthly_income"))?,
            self.vehicle_price
                .ok_or(InputError::MissingField("vehicle_price"))?,
        ))
    }
}

/// Wire shape: the menu is keyed `loan_options` or `lease_options`.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub tier: CreditTier,
    pub down_payment: f64,
    pub loan_to_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_options: Option<Vec<FinancingOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_options: Option<Vec<FinancingOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_term: Option<u32>,
    pub advisory: AdvisoryStatus,
}

impl From<FinancingQuote> for QuoteResponse {
    fn from(quote: FinancingQuote) -> Self {
        let (loan_options, lease_options) = match quote.kind {
            FinancingKind::Loan => (Some(quote.options), None),
            FinancingKind::Lease => (None, Some(quote.options)),
        };

        Self {
            tier: quote.tier,
            down_payment: quote.down_payment,
            loan_to_value: quote.loan_to_value,
            loan_options,
            lease_options,
            recommended_term: quote.recommended_term,
            advisory: quote.advisory,
        }
    }
}

/// Router builder exposing the loan and lease quote endpoints.
pub fn financing_router<T, A>(service: Arc<FinancingQuoteService<T, A>>) -> Router
where
    T: RateTable + 'static,
    A: AdvisoryGateway + 'static,
{
    Router::new()
        .route("/api/v1/financing/loan", post(loan_handler::<T, A>))
        .route("/api/v1/financing/lease", post(lease_handler::<T, A>))
        .with_state(service)
}

pub(crate) async fn loan_handler<T, A>(
    State(service): State<Arc<FinancingQuoteService<T, A>>>,
    axum::Json(request): axum::Json<FinancingRequest>,
) -> Response
where
    T: RateTable + 'static,
    A: AdvisoryGateway + 'static,
{
    quote_response(&service, FinancingKind::Loan, request).await
}

pub(crate) async fn lease_handler<T, A>(
    State(service): State<Arc<FinancingQuoteService<T, A>>>,
    axum::Json(request): axum::Json<FinancingRequest>,
) -> Response
where
    T: RateTable + 'static,
    A: AdvisoryGateway + 'static,
{
    quote_response(&service, FinancingKind::Lease, request).await
}

async fn quote_response<T, A>(
    service: &FinancingQuoteService<T, A>,
    kind: FinancingKind,
    request: FinancingRequest,
) -> Response
where
    T: RateTable + 'static,
    A: AdvisoryGateway + 'static,
{
    let profile = match request.into_profile() {
        Ok(profile) => profile,
        Err(error) => return quote_error_response(QuoteError::Input(error)),
    };

    match service.quote(kind, profile).await {
        Ok(quote) => (StatusCode::OK, axum::Json(QuoteResponse::from(quote))).into_response(),
        Err(error) => quote_error_response(error),
    }
}

fn quote_error_response(error: QuoteError) -> Response {
    let status = match &error {
        QuoteError::Input(_) | QuoteError::Affordability(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuoteError::RateTable(RateTableError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        QuoteError::RateTable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
