use async_trait::async_trait;
use auto_quote::config::{AdvisoryConfig, AppConfig, AppEnvironment};
use auto_quote::error::AppError;
use auto_quote::workflows::financing::{
    AdvisoryError, AdvisoryGateway, CreditProfile, CreditTier, FinancingConfig,
    FinancingConfigError, FinancingEngine, FinancingOption, FinancingQuoteService, HttpAdvisor,
    NoAdvisor, RateEntry, RateSheet, RateTableError,
};
use auto_quote::workflows::matching::{
    CatalogError, CatalogImportError, CsvCatalogImporter, VehicleCatalog, VehicleMatchService,
    VehicleMatcher, VehicleProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

const BUNDLED_CATALOG: &str = include_str!("../data/vehicle_catalog.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) environment: AppEnvironment,
    pub(crate) settings: Arc<PublicSettings>,
}

/// Non-secret settings exposed by the development config endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PublicSettings {
    pub(crate) environment: &'static str,
    pub(crate) advisory_enabled: bool,
    pub(crate) advisory_endpoint: String,
    pub(crate) advisory_model: String,
    pub(crate) advisory_timeout_ms: u64,
    pub(crate) terms: Vec<u32>,
    pub(crate) rate_table: Vec<RateEntry>,
    pub(crate) catalog_source: String,
    pub(crate) catalog_size: usize,
}

impl PublicSettings {
    pub(crate) fn describe(
        config: &AppConfig,
        engine: &FinancingEngine,
        rates: &RateSheet,
        catalog: &InMemoryCatalog,
    ) -> Self {
        Self {
            environment: config.environment.label(),
            advisory_enabled: config.advisory.api_key.is_some(),
            advisory_endpoint: config.advisory.endpoint.clone(),
            advisory_model: config.advisory.model.clone(),
            advisory_timeout_ms: u64::try_from(config.advisory.timeout.as_millis())
                .unwrap_or(u64::MAX),
            terms: engine.schedule().terms().collect(),
            rate_table: rates.entries(),
            catalog_source: match &config.sources.catalog_csv_path {
                Some(path) => path.display().to_string(),
                None => "bundled".to_string(),
            },
            catalog_size: catalog.len(),
        }
    }
}

/// Base rates from the reference lending table, lowest risk first.
pub(crate) fn standard_rate_entries() -> [RateEntry; 5] {
    [
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
    ]
}

pub(crate) fn standard_rate_sheet() -> Result<RateSheet, RateTableError> {
    RateSheet::from_entries(standard_rate_entries())
}

#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryCatalog {
    vehicles: Arc<Vec<VehicleProfile>>,
}

impl InMemoryCatalog {
    pub(crate) fn new(vehicles: Vec<VehicleProfile>) -> Self {
        Self {
            vehicles: Arc::new(vehicles),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.vehicles.len()
    }
}

impl VehicleCatalog for InMemoryCatalog {
    fn vehicles(&self) -> Result<Vec<VehicleProfile>, CatalogError> {
        Ok(self.vehicles.as_ref().clone())
    }
}

pub(crate) fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog, CatalogImportError> {
    let vehicles = match path {
        Some(path) => CsvCatalogImporter::from_path(path)?,
        None => CsvCatalogImporter::from_reader(Cursor::new(BUNDLED_CATALOG))?,
    };
    Ok(InMemoryCatalog::new(vehicles))
}

pub(crate) fn load_financing_config(
    path: Option<&Path>,
) -> Result<FinancingConfig, FinancingConfigError> {
    match path {
        Some(path) => FinancingConfig::from_path(path),
        None => Ok(FinancingConfig::default()),
    }
}

/// Advisor chosen at startup from configuration.
pub(crate) enum ServiceAdvisor {
    Http(HttpAdvisor),
    Disabled(NoAdvisor),
}

impl ServiceAdvisor {
    pub(crate) fn from_config(config: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        match HttpAdvisor::from_config(config)? {
            Some(advisor) => {
                info!(endpoint = %config.endpoint, model = %config.model, "term advisor enabled");
                Ok(Self::Http(advisor))
            }
            None => {
                warn!("ADVISORY_API_KEY not set; quotes will carry no term recommendation");
                Ok(Self::Disabled(NoAdvisor))
            }
        }
    }
}

#[async_trait]
impl AdvisoryGateway for ServiceAdvisor {
    async fn recommend(
        &self,
        menu: &[FinancingOption],
        profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError> {
        match self {
            ServiceAdvisor::Http(advisor) => advisor.recommend(menu, profile).await,
            ServiceAdvisor::Disabled(advisor) => advisor.recommend(menu, profile).await,
        }
    }
}

pub(crate) fn build_engine(config: &AppConfig) -> Result<FinancingEngine, AppError> {
    let financing_config = load_financing_config(config.sources.financing_config_path.as_deref())?;
    Ok(FinancingEngine::new(&financing_config)?)
}

pub(crate) fn build_financing_service<A>(
    config: &AppConfig,
    advisor: A,
) -> Result<FinancingQuoteService<RateSheet, A>, AppError>
where
    A: AdvisoryGateway + 'static,
{
    Ok(FinancingQuoteService::new(
        build_engine(config)?,
        Arc::new(standard_rate_sheet()?),
        Arc::new(advisor),
        config.advisory.timeout,
    ))
}

pub(crate) fn build_match_service(
    catalog: InMemoryCatalog,
) -> VehicleMatchService<InMemoryCatalog> {
    VehicleMatchService::new(Arc::new(catalog), VehicleMatcher::default())
}
