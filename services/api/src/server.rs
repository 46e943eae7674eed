use crate::cli::ServeArgs;
use crate::infra::{
    build_financing_service, build_match_service, load_catalog, standard_rate_sheet, AppState,
    PublicSettings, ServiceAdvisor,
};
use crate::routes::with_quote_routes;
use auto_quote::config::AppConfig;
use auto_quote::error::AppError;
use auto_quote::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    for name in config.missing_optional() {
        warn!(variable = name, "optional integration not configured");
    }

    let advisor = ServiceAdvisor::from_config(&config.advisory)?;
    let financing_service = build_financing_service(&config, advisor)?;
    let catalog = load_catalog(config.sources.catalog_csv_path.as_deref())?;
    let settings = PublicSettings::describe(
        &config,
        financing_service.engine(),
        &standard_rate_sheet()?,
        &catalog,
    );
    info!(
        vehicles = catalog.len(),
        terms = ?settings.terms,
        "reference data loaded"
    );
    let match_service = build_match_service(catalog);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        environment: config.environment,
        settings: Arc::new(settings),
    };

    let app = with_quote_routes(Arc::new(financing_service), Arc::new(match_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = config.environment.label(), %addr, "auto quote service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
