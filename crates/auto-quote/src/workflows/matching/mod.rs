//! Attribute-weighted vehicle matching over a read-only catalog.

pub mod catalog;
pub mod domain;
mod import;
pub mod router;
mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, VehicleCatalog};
pub use domain::{
    BodyStyle, DriveType, DrivingExperience, EngineType, MatchField, MatchQuery, Priority,
    ScoredMatch, TrimLevel, UnknownLabel, Usage, VehicleId, VehicleProfile,
};
pub use import::{CatalogImportError, CsvCatalogImporter};
pub use router::vehicle_router;
pub use scoring::{MatchWeights, VehicleMatcher};
pub use service::{MatchError, VehicleMatchService};
