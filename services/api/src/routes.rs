use crate::infra::AppState;
use auto_quote::config::AppEnvironment;
use auto_quote::workflows::financing::{
    financing_router, AdvisoryGateway, FinancingQuoteService, RateTable,
};
use auto_quote::workflows::matching::{vehicle_router, VehicleCatalog, VehicleMatchService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_quote_routes<T, A, C>(
    financing: Arc<FinancingQuoteService<T, A>>,
    matching: Arc<VehicleMatchService<C>>,
) -> axum::Router
where
    T: RateTable + 'static,
    A: AdvisoryGateway + 'static,
    C: VehicleCatalog + 'static,
{
    financing_router(financing)
        .merge(vehicle_router(matching))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/config", get(config_endpoint))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment.label(),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Development-only view of the effective settings.
pub(crate) async fn config_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.environment != AppEnvironment::Development {
        let payload = json!({
            "error": "configuration endpoint is only available in development",
        });
        return (StatusCode::FORBIDDEN, Json(payload)).into_response();
    }

    (StatusCode::OK, Json(state.settings.as_ref().clone())).into_response()
}
