use std::sync::Arc;

use tracing::debug;

use super::catalog::{CatalogError, VehicleCatalog};
use super::domain::{MatchQuery, ScoredMatch};
use super::scoring::VehicleMatcher;

/// Service pairing a catalog port with the attribute matcher.
pub struct VehicleMatchService<C> {
    catalog: Arc<C>,
    matcher: VehicleMatcher,
}

impl<C> VehicleMatchService<C>
where
    C: VehicleCatalog + 'static,
{
    pub fn new(catalog: Arc<C>, matcher: VehicleMatcher) -> Self {
        Self { catalog, matcher }
    }

    pub fn matcher(&self) -> &VehicleMatcher {
        &self.matcher
    }

    /// Reads the catalog fresh on every call; a failing catalog fails the request.
    pub fn match_vehicles(&self, query: &MatchQuery) -> Result<Vec<ScoredMatch>, MatchError> {
        let catalog = self.catalog.vehicles()?;
        let matches = self.matcher.rank(&catalog, query);

        debug!(
            catalog = catalog.len(),
            returned = matches.len(),
            top_score = ?matches.first().map(|top| top.score),
            "ranked vehicle catalog"
        );

        Ok(matches)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
