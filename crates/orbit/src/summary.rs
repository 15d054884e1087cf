use feeds::NeoEntry;
use foundation::group_thousands;
use foundation::time::Timestamp;

use crate::elements::OrbitParameters;

/// Info panel shown next to the orbit preview.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSummary {
    pub title: String,
    pub diameter_km: f64,
    pub velocity_km_s: f64,
    pub miss_distance_km: f64,
    pub approach: Option<Timestamp>,
    pub orbit: OrbitParameters,
}

impl OrbitSummary {
    pub fn new(entry: &NeoEntry, orbit: OrbitParameters) -> Self {
        let approach = &entry.close_approach;
        Self {
            title: if entry.name.is_empty() {
                "Asteroid Orbit".to_string()
            } else {
                entry.name.clone()
            },
            diameter_km: entry.average_diameter_km(),
            velocity_km_s: approach.relative_velocity_km_s.unwrap_or(0.0),
            miss_distance_km: approach.miss_distance_km.unwrap_or(0.0),
            approach: approach.timestamp,
            orbit,
        }
    }

    /// `(label, value)` rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Diameter", format!("{:.3} km", self.diameter_km)),
            ("Velocity", format!("{:.2} km/s", self.velocity_km_s)),
            (
                "Miss Distance",
                format!("{} km", group_thousands(self.miss_distance_km, 0)),
            ),
            (
                "Closest Approach",
                self.approach
                    .map(Timestamp::short_date)
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
            (
                "Semi-Major Axis",
                format!("{:.3} AU", self.orbit.semi_major_axis_au),
            ),
            ("Eccentricity", format!("{:.3}", self.orbit.eccentricity)),
            ("Inclination", format!("{:.2}°", self.orbit.inclination_deg)),
            ("Perihelion", format!("{:.3} AU", self.orbit.perihelion_au)),
        ]
    }
}
