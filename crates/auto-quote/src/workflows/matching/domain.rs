use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label matching ignores case, spacing and punctuation: "Mini-van",
/// "minivan" and "MINI VAN" are the same body style.
pub(crate) fn normalize_label(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! catalog_label {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                let wanted = normalize_label(value);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| normalize_label(candidate.label()) == wanted)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| UnknownLabel {
                    kind: $kind,
                    value: value.trim().to_string(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

catalog_label! {
    BodyStyle("body style") {
        Sedan => "Sedan",
        Suv => "SUV",
        Truck => "Truck",
        Minivan => "Mini-van",
    }
}

catalog_label! {
    Usage("usage") {
        DailyCommuting => "Daily commuting",
        OffRoad => "Off-road",
        Work => "Work",
        Leisure => "Leisure",
    }
}

catalog_label! {
    DrivingExperience("driving experience") {
        SmoothComfortable => "Smooth & comfortable",
        SportyResponsive => "Sporty & responsive",
        OffRoadCapable => "Off-road capable",
    }
}

catalog_label! {
    EngineType("engine type") {
        Gasoline => "Gasoline",
        Hybrid => "Hybrid",
        Electric => "Electric",
    }
}

catalog_label! {
    DriveType("drive type") {
        Awd => "AWD",
        Rwd => "RWD",
        Fwd => "FWD",
    }
}

catalog_label! {
    TrimLevel("trim level") {
        Base => "Base",
        Sport => "Sport",
        Ex => "EX",
        Luxury => "Luxury",
    }
}

catalog_label! {
    Priority("priority") {
        FuelEfficiency => "Fuel efficiency",
        Power => "Power",
    }
}

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

impl VehicleId {
    /// Slug derived from a display name: lowercase words joined by `-`.
    pub fn from_name(name: &str) -> Self {
        let slug = name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        Self(slug)
    }
}

/// Read-only catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: VehicleId,
    pub name: String,
    pub body_style: BodyStyle,
    pub usage: BTreeSet<Usage>,
    pub driving_experience: BTreeSet<DrivingExperience>,
    pub engine_type: BTreeSet<EngineType>,
    pub seat_count: u8,
    pub drive_type: BTreeSet<DriveType>,
    pub trim_levels: BTreeSet<TrimLevel>,
    pub priority: BTreeSet<Priority>,
    pub price: f64,
    pub description: String,
}

/// Shopper preferences. `None` leaves a field unconstrained; `Some(vec![])`
/// is present but empty and neither boosts nor excludes anything.
///
/// Every list field also accepts a single label on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub body_style: Option<Vec<BodyStyle>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub usage: Option<Vec<Usage>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub driving_experience: Option<Vec<DrivingExperience>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<Vec<EngineType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_count: Option<i32>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<Vec<DriveType>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub trim_levels: Option<Vec<TrimLevel>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<Priority>>,
}

impl MatchQuery {
    /// Minimum seat count, if one is actually being enforced. Zero and
    /// negative counts leave the catalog unfiltered.
    pub fn minimum_seats(&self) -> Option<i32> {
        self.seat_count.filter(|seats| *seats > 0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(values) => values,
    }))
}

/// Query field that contributed to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    BodyStyle,
    EngineType,
    Priority,
    Usage,
    DrivingExperience,
    DriveType,
    TrimLevels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub vehicle: VehicleProfile,
    pub score: f64,
    pub matched: Vec<MatchField>,
}
