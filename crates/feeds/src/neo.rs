//! Near-Earth-object catalog records (NeoWs feed and lookup payloads).

use std::collections::BTreeMap;

use foundation::time::{Timestamp, parse_catalog_datetime};
use serde::{Deserialize, Serialize};

/// Feed payload: objects grouped by approach date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeoFeed {
    #[serde(default)]
    pub element_count: Option<u32>,
    #[serde(default)]
    pub near_earth_objects: BTreeMap<String, Vec<NeoRecord>>,
}

impl NeoFeed {
    /// All records from every date bucket, bucket order then in-bucket order.
    pub fn flatten(&self) -> Vec<&NeoRecord> {
        self.near_earth_objects.values().flatten().collect()
    }
}

/// One catalog object as served by both the feed and the per-object lookup.
/// The lookup additionally fills `orbital_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeoRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: Option<bool>,
    #[serde(default, deserialize_with = "crate::json::de_null_default")]
    pub close_approach_data: Vec<CloseApproachRecord>,
    #[serde(default)]
    pub orbital_data: Option<OrbitalDataRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default)]
    pub kilometers: Option<DiameterRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiameterRange {
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub estimated_diameter_min: Option<f64>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub estimated_diameter_max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseApproachRecord {
    #[serde(default)]
    pub close_approach_date: Option<String>,
    #[serde(default)]
    pub close_approach_date_full: Option<String>,
    #[serde(default)]
    pub epoch_date_close_approach: Option<i64>,
    #[serde(default)]
    pub relative_velocity: Option<RelativeVelocity>,
    #[serde(default)]
    pub miss_distance: Option<MissDistance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub kilometers_per_second: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub kilometers: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalDataRecord {
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub semi_major_axis: Option<f64>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub eccentricity: Option<f64>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub inclination: Option<f64>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub perihelion_distance: Option<f64>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pub aphelion_distance: Option<f64>,
}

/// Closest-approach summary of an entry (first listed approach).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseApproach {
    /// Catalog date text, e.g. `2024-Jan-05 12:34`.
    pub date: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub relative_velocity_km_s: Option<f64>,
    pub miss_distance_km: Option<f64>,
}

/// Orbital elements from a detail lookup; any element may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis_au: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination_deg: Option<f64>,
    pub perihelion_au: Option<f64>,
    pub aphelion_au: Option<f64>,
}

/// Normalized catalog entry used by the browser and the orbit preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeoEntry {
    pub id: String,
    pub name: String,
    pub diameter_min_km: f64,
    pub diameter_max_km: f64,
    pub is_hazardous: bool,
    pub close_approach: CloseApproach,
    pub orbit: Option<OrbitalElements>,
}

impl NeoEntry {
    pub fn from_record(record: &NeoRecord) -> Self {
        let km = record
            .estimated_diameter
            .as_ref()
            .and_then(|d| d.kilometers.as_ref());
        let approach = record.close_approach_data.first();

        let close_approach = approach
            .map(|a| CloseApproach {
                date: a
                    .close_approach_date_full
                    .clone()
                    .or_else(|| a.close_approach_date.clone()),
                timestamp: approach_timestamp(a),
                relative_velocity_km_s: a
                    .relative_velocity
                    .as_ref()
                    .and_then(|v| v.kilometers_per_second),
                miss_distance_km: a.miss_distance.as_ref().and_then(|m| m.kilometers),
            })
            .unwrap_or_default();

        let orbit = record.orbital_data.as_ref().map(|o| OrbitalElements {
            semi_major_axis_au: o.semi_major_axis,
            eccentricity: o.eccentricity,
            inclination_deg: o.inclination,
            perihelion_au: o.perihelion_distance,
            aphelion_au: o.aphelion_distance,
        });

        Self {
            id: record.id.clone(),
            name: record
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            diameter_min_km: km.and_then(|k| k.estimated_diameter_min).unwrap_or(0.0),
            diameter_max_km: km.and_then(|k| k.estimated_diameter_max).unwrap_or(0.0),
            is_hazardous: record.is_potentially_hazardous_asteroid.unwrap_or(false),
            close_approach,
            orbit,
        }
    }

    pub fn average_diameter_km(&self) -> f64 {
        (self.diameter_min_km + self.diameter_max_km) / 2.0
    }

    /// Sort key for "closest approach first"; a missing time sorts as the epoch.
    pub fn approach_sort_key(&self) -> Timestamp {
        self.close_approach.timestamp.unwrap_or(Timestamp::EPOCH)
    }
}

fn approach_timestamp(approach: &CloseApproachRecord) -> Option<Timestamp> {
    if let Some(ms) = approach.epoch_date_close_approach {
        return Some(Timestamp::from_millis(ms));
    }
    approach
        .close_approach_date_full
        .as_deref()
        .or(approach.close_approach_date.as_deref())
        .and_then(parse_catalog_date)
}

fn parse_catalog_date(text: &str) -> Option<Timestamp> {
    // Short dates come as `YYYY-MM-DD`; full ones as `YYYY-Mon-DD HH:MM`.
    parse_catalog_datetime(text).or_else(|| {
        let mut parts = text.trim().split('-');
        let year: i64 = parts.next()?.parse().ok()?;
        let month: u8 = parts.next()?.parse().ok()?;
        let day: u8 = parts.next()?.parse().ok()?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) || parts.next().is_some() {
            return None;
        }
        Some(Timestamp::from_millis(
            foundation::time::days_from_civil(year, month, day) * 86_400_000,
        ))
    })
}
