use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::catalog::VehicleCatalog;
use super::domain::{MatchQuery, ScoredMatch};
use super::service::{MatchError, VehicleMatchService};

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<ScoredMatch>,
}

/// Router builder exposing the catalog match endpoint.
pub fn vehicle_router<C>(service: Arc<VehicleMatchService<C>>) -> Router
where
    C: VehicleCatalog + 'static,
{
    Router::new()
        .route("/api/v1/vehicles/match", post(match_handler::<C>))
        .with_state(service)
}

pub(crate) async fn match_handler<C>(
    State(service): State<Arc<VehicleMatchService<C>>>,
    axum::Json(query): axum::Json<MatchQuery>,
) -> Response
where
    C: VehicleCatalog + 'static,
{
    match service.match_vehicles(&query) {
        Ok(matches) => (StatusCode::OK, axum::Json(MatchResponse { matches })).into_response(),
        Err(MatchError::Catalog(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
