use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use super::domain::{BodyStyle, UnknownLabel, VehicleId, VehicleProfile};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read vehicle catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid vehicle catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("vehicle catalog line {line}: {detail}")]
    InvalidRow { line: u64, detail: String },
}

/// Loads catalog entries from a CSV export with one vehicle per row.
///
/// Multi-valued cells separate labels with `;`. Labels are matched without
/// regard to case or punctuation.
pub struct CsvCatalogImporter;

impl CsvCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleProfile>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<VehicleProfile>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut vehicles = Vec::new();

        for (index, result) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = result?;
            // Line 1 is the header.
            let line = index as u64 + 2;
            let vehicle = row
                .into_profile()
                .map_err(|detail| CatalogImportError::InvalidRow { line, detail })?;
            vehicles.push(vehicle);
        }

        Ok(vehicles)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    body_style: String,
    #[serde(default)]
    usage: String,
    #[serde(default)]
    driving_experience: String,
    #[serde(default)]
    engine_type: String,
    seats: u8,
    #[serde(default)]
    drive_type: String,
    #[serde(default)]
    trim_levels: String,
    #[serde(default)]
    priority: String,
    price: f64,
    #[serde(default)]
    description: String,
}

impl CatalogRow {
    fn into_profile(self) -> Result<VehicleProfile, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("vehicle name is empty".to_string());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(format!("price for {name} must be positive (got {})", self.price));
        }

        let describe = |err: UnknownLabel| format!("{name}: {err}");
        let body_style: BodyStyle = self.body_style.parse().map_err(describe)?;
        let usage = parse_labels(&self.usage).map_err(describe)?;
        let driving_experience = parse_labels(&self.driving_experience).map_err(describe)?;
        let engine_type = parse_labels(&self.engine_type).map_err(describe)?;
        let drive_type = parse_labels(&self.drive_type).map_err(describe)?;
        let trim_levels = parse_labels(&self.trim_levels).map_err(describe)?;
        let priority = parse_labels(&self.priority).map_err(describe)?;

        Ok(VehicleProfile {
            id: VehicleId::from_name(&name),
            name,
            body_style,
            usage,
            driving_experience,
            engine_type,
            seat_count: self.seats,
            drive_type,
            trim_levels,
            priority,
            price: self.price,
            description: self.description,
        })
    }
}

fn parse_labels<T>(cell: &str) -> Result<BTreeSet<T>, UnknownLabel>
where
    T: FromStr<Err = UnknownLabel> + Ord,
{
    cell.split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::parse)
        .collect()
}
