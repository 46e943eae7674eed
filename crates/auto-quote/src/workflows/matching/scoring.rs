use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{MatchField, MatchQuery, ScoredMatch, VehicleProfile};

/// Fixed boost applied when a populated query field overlaps the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub body_style: f64,
    pub engine_type: f64,
    pub priority: f64,
    pub usage: f64,
    pub driving_experience: f64,
    pub drive_type: f64,
    pub trim_levels: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            body_style: 30.0,
            engine_type: 20.0,
            priority: 20.0,
            usage: 10.0,
            driving_experience: 10.0,
            drive_type: 10.0,
            trim_levels: 5.0,
        }
    }
}

impl MatchWeights {
    pub fn weight(&self, field: MatchField) -> f64 {
        match field {
            MatchField::BodyStyle => self.body_style,
            MatchField::EngineType => self.engine_type,
            MatchField::Priority => self.priority,
            MatchField::Usage => self.usage,
            MatchField::DrivingExperience => self.driving_experience,
            MatchField::DriveType => self.drive_type,
            MatchField::TrimLevels => self.trim_levels,
        }
    }

    /// Score a vehicle that satisfies every populated field.
    pub fn max_score(&self) -> f64 {
        self.body_style
            + self.engine_type
            + self.priority
            + self.usage
            + self.driving_experience
            + self.drive_type
            + self.trim_levels
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleMatcher {
    weights: MatchWeights,
}

impl VehicleMatcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Ranks `catalog` against `query`: highest score first, then the more
    /// expensive vehicle, then catalog order. Seat count is the only filter;
    /// every other vehicle is returned, with score 0 if nothing overlapped.
    pub fn rank(&self, catalog: &[VehicleProfile], query: &MatchQuery) -> Vec<ScoredMatch> {
        let minimum_seats = query.minimum_seats();

        let mut matches: Vec<ScoredMatch> = catalog
            .iter()
            .filter(|vehicle| {
                minimum_seats.map_or(true, |seats| i32::from(vehicle.seat_count) >= seats)
            })
            .map(|vehicle| self.score(vehicle, query))
            .collect();

        matches.sort_by(|left, right| {
            right
                .score
                .total_cmp(&left.score)
                .then_with(|| right.vehicle.price.total_cmp(&left.vehicle.price))
        });
        matches
    }

    pub fn score(&self, vehicle: &VehicleProfile, query: &MatchQuery) -> ScoredMatch {
        let checks = [
            (
                MatchField::BodyStyle,
                query
                    .body_style
                    .as_deref()
                    .is_some_and(|wanted| wanted.contains(&vehicle.body_style)),
            ),
            (
                MatchField::EngineType,
                overlaps(query.engine_type.as_deref(), &vehicle.engine_type),
            ),
            (
                MatchField::Priority,
                overlaps(query.priority.as_deref(), &vehicle.priority),
            ),
            (MatchField::Usage, overlaps(query.usage.as_deref(), &vehicle.usage)),
            (
                MatchField::DrivingExperience,
                overlaps(
                    query.driving_experience.as_deref(),
                    &vehicle.driving_experience,
                ),
            ),
            (
                MatchField::DriveType,
                overlaps(query.drive_type.as_deref(), &vehicle.drive_type),
            ),
            (
                MatchField::TrimLevels,
                overlaps(query.trim_levels.as_deref(), &vehicle.trim_levels),
            ),
        ];

        let matched: Vec<MatchField> = checks
            .into_iter()
            .filter_map(|(field, hit)| hit.then_some(field))
            .collect();
        let score: f64 = matched.iter().map(|field| self.weights.weight(*field)).sum();

        ScoredMatch {
            vehicle: vehicle.clone(),
            score,
            matched,
        }
    }
}

fn overlaps<T: Ord>(wanted: Option<&[T]>, offered: &BTreeSet<T>) -> bool {
    wanted.is_some_and(|values| values.iter().any(|value| offered.contains(value)))
}
