use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::financing::{
    AdvisoryError, FinancingConfigError, QuoteError, RateTableError, ScheduleError,
};
use crate::workflows::matching::{CatalogImportError, MatchError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    FinancingConfig(FinancingConfigError),
    RateTable(RateTableError),
    Advisory(AdvisoryError),
    CatalogImport(CatalogImportError),
    Quote(QuoteError),
    Match(MatchError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::FinancingConfig(err) => write!(f, "financing configuration error: {}", err),
            AppError::RateTable(err) => write!(f, "rate table error: {}", err),
            AppError::Advisory(err) => write!(f, "advisory client error: {}", err),
            AppError::CatalogImport(err) => write!(f, "catalog import error: {}", err),
            AppError::Quote(err) => write!(f, "quote error: {}", err),
            AppError::Match(err) => write!(f, "match error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::FinancingConfig(err) => Some(err),
            AppError::RateTable(err) => Some(err),
            AppError::Advisory(err) => Some(err),
            AppError::CatalogImport(err) => Some(err),
            AppError::Quote(err) => Some(err),
            AppError::Match(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Quote(QuoteError::Input(_) | QuoteError::Affordability(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Quote(QuoteError::RateTable(RateTableError::Unavailable(_)))
            | AppError::CatalogImport(_)
            | AppError::Match(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Quote(QuoteError::RateTable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::FinancingConfig(_)
            | AppError::RateTable(_)
            | AppError::Advisory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<FinancingConfigError> for AppError {
    fn from(value: FinancingConfigError) -> Self {
        Self::FinancingConfig(value)
    }
}

impl From<ScheduleError> for AppError {
    fn from(value: ScheduleError) -> Self {
        Self::FinancingConfig(FinancingConfigError::Schedule(value))
    }
}

impl From<RateTableError> for AppError {
    fn from(value: RateTableError) -> Self {
        Self::RateTable(value)
    }
}

impl From<AdvisoryError> for AppError {
    fn from(value: AdvisoryError) -> Self {
        Self::Advisory(value)
    }
}

impl From<CatalogImportError> for AppError {
    fn from(value: CatalogImportError) -> Self {
        Self::CatalogImport(value)
    }
}

impl From<QuoteError> for AppError {
    fn from(value: QuoteError) -> Self {
        Self::Quote(value)
    }
}

impl From<MatchError> for AppError {
    fn from(value: MatchError) -> Self {
        Self::Match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_import_failures_are_service_unavailable() {
        let error = AppError::from(CatalogImportError::InvalidRow {
            line: 4,
            detail: "unknown body style 'Coupe'".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "catalog import error: vehicle catalog line 4: unknown body style 'Coupe'"
        );
        assert_eq!(
            error.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn invalid_quote_input_is_unprocessable() {
        let error = AppError::from(QuoteError::Input(
            crate::workflows::financing::InputError::CreditScoreOutOfRange(200),
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn schedule_errors_surface_as_financing_configuration() {
        let error = AppError::from(ScheduleError::Empty);
        assert!(matches!(
            error,
            AppError::FinancingConfig(FinancingConfigError::Schedule(ScheduleError::Empty))
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
