use super::domain::VehicleProfile;

/// Read-only source of catalog entries (a document store in production).
pub trait VehicleCatalog: Send + Sync {
    fn vehicles(&self) -> Result<Vec<VehicleProfile>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("vehicle catalog unavailable: {0}")]
    Unavailable(String),
}
