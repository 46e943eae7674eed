use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::matching::{
    BodyStyle, CatalogError, DriveType, DrivingExperience, EngineType, Priority, TrimLevel, Usage,
    VehicleCatalog, VehicleId, VehicleMatchService, VehicleMatcher, VehicleProfile,
};

pub(super) struct VehicleSpec {
    pub(super) name: &'static str,
    pub(super) body_style: BodyStyle,
    pub(super) seats: u8,
    pub(super) engine: &'static [EngineType],
    pub(super) usage: &'static [Usage],
    pub(super) drive: &'static [DriveType],
    pub(super) priority: &'static [Priority],
    pub(super) price: f64,
}

pub(super) fn vehicle(spec: VehicleSpec) -> VehicleProfile {
    VehicleProfile {
        id: VehicleId::from_name(spec.name),
        name: spec.name.to_string(),
        body_style: spec.body_style,
        usage: spec.usage.iter().copied().collect(),
        driving_experience: BTreeSet::from([DrivingExperience::SmoothComfortable]),
        engine_type: spec.engine.iter().copied().collect(),
        seat_count: spec.seats,
        drive_type: spec.drive.iter().copied().collect(),
        trim_levels: BTreeSet::from([TrimLevel::Base, TrimLevel::Luxury]),
        priority: spec.priority.iter().copied().collect(),
        price: spec.price,
        description: format!("{} test fixture", spec.name),
    }
}

/// Small catalog mixing seat counts, body styles and prices.
pub(super) fn catalog() -> Vec<VehicleProfile> {
    vec![
        vehicle(VehicleSpec {
            name: "Camry",
            body_style: BodyStyle::Sedan,
            seats: 5,
            engine: &[EngineType::Gasoline, EngineType::Hybrid],
            usage: &[Usage::DailyCommuting],
            drive: &[DriveType::Fwd],
            priority: &[Priority::FuelEfficiency],
            price: 28400.0,
        }),
        vehicle(VehicleSpec {
            name: "Stretch Sedan",
            body_style: BodyStyle::Sedan,
            seats: 7,
            engine: &[EngineType::Gasoline],
            usage: &[Usage::Leisure],
            drive: &[DriveType::Rwd],
            priority: &[Priority::Power],
            price: 52000.0,
        }),
        vehicle(VehicleSpec {
            name: "Highlander",
            body_style: BodyStyle::Suv,
            seats: 7,
            engine: &[EngineType::Gasoline],
            usage: &[Usage::Leisure],
            drive: &[DriveType::Awd, DriveType::Fwd],
            priority: &[Priority::FuelEfficiency],
            price: 39520.0,
        }),
        vehicle(VehicleSpec {
            name: "RAV4",
            body_style: BodyStyle::Suv,
            seats: 5,
            engine: &[EngineType::Gasoline],
            usage: &[Usage::DailyCommuting, Usage::Leisure],
            drive: &[DriveType::Awd],
            priority: &[Priority::FuelEfficiency],
            price: 28675.0,
        }),
        vehicle(VehicleSpec {
            name: "Highlander Hybrid",
            body_style: BodyStyle::Suv,
            seats: 7,
            engine: &[EngineType::Hybrid],
            usage: &[Usage::Leisure],
            drive: &[DriveType::Awd],
            priority: &[Priority::FuelEfficiency],
            price: 44470.0,
        }),
        vehicle(VehicleSpec {
            name: "Tacoma",
            body_style: BodyStyle::Truck,
            seats: 5,
            engine: &[EngineType::Gasoline],
            usage: &[Usage::Work, Usage::OffRoad],
            drive: &[DriveType::Rwd, DriveType::Awd],
            priority: &[Priority::Power],
            price: 31500.0,
        }),
    ]
}

pub(super) fn names(matches: &[crate::workflows::matching::ScoredMatch]) -> Vec<&str> {
    matches.iter().map(|entry| entry.vehicle.name.as_str()).collect()
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    vehicles: Vec<VehicleProfile>,
    reads: AtomicUsize,
}

impl MemoryCatalog {
    pub(super) fn new(vehicles: Vec<VehicleProfile>) -> Self {
        Self {
            vehicles,
            reads: AtomicUsize::new(0),
        }
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl VehicleCatalog for MemoryCatalog {
    fn vehicles(&self) -> Result<Vec<VehicleProfile>, CatalogError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.vehicles.clone())
    }
}

pub(super) struct OfflineCatalog;

impl VehicleCatalog for OfflineCatalog {
    fn vehicles(&self) -> Result<Vec<VehicleProfile>, CatalogError> {
        Err(CatalogError::Unavailable("catalog store offline".to_string()))
    }
}

pub(super) fn build_service() -> (VehicleMatchService<MemoryCatalog>, Arc<MemoryCatalog>) {
    let catalog = Arc::new(MemoryCatalog::new(catalog()));
    let service = VehicleMatchService::new(catalog.clone(), VehicleMatcher::default());
    (service, catalog)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
