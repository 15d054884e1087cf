//! Plain-text results panel composed after a successful run.

use feeds::{EarthquakeRecord, SeismicProfile, design_category_description, strongest};
use foundation::format_locale;
use foundation::math::{LatLon, cardinal_direction, earthquake_energy_mt, haversine_distance_km};
use foundation::time::Timestamp;
use layers::FootprintRadii;

use crate::backend::SimulationResult;

pub const SEISMIC_UNAVAILABLE: &str = "Seismic data unavailable for this location.";
pub const NO_EARTHQUAKES: &str =
    "No recent earthquake activity found within 500 km of this impact site.";

/// The strongest nearby earthquake set against the simulated impact.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeComparison {
    pub magnitude: f64,
    pub place: String,
    pub timestamp: Timestamp,
    pub distance_km: f64,
    pub direction: String,
    pub energy_mt: f64,
    /// Impact energy divided by earthquake energy.
    pub ratio: f64,
}

impl EarthquakeComparison {
    /// Compares `impact_energy_mt` with the strongest of `records`; `None`
    /// when there are no records.
    pub fn strongest_of(
        impact_energy_mt: f64,
        records: &[EarthquakeRecord],
        site: LatLon,
    ) -> Option<Self> {
        strongest(records).map(|record| Self::new(impact_energy_mt, record, site))
    }

    pub fn new(impact_energy_mt: f64, record: &EarthquakeRecord, site: LatLon) -> Self {
        let energy_mt = earthquake_energy_mt(record.magnitude);
        Self {
            magnitude: record.magnitude,
            place: record
                .place
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Unknown location".to_string()),
            timestamp: record.timestamp,
            distance_km: haversine_distance_km(
                site.lat,
                site.lon,
                record.latitude,
                record.longitude,
            ),
            direction: cardinal_direction(site.lat, site.lon, record.latitude, record.longitude),
            energy_mt,
            ratio: impact_energy_mt / energy_mt,
        }
    }

    pub fn comparison_text(&self) -> String {
        if self.ratio >= 1.0 {
            format!(
                "The asteroid impact releases {:.1}× more energy than this earthquake.",
                self.ratio
            )
        } else {
            format!(
                "This earthquake released {:.1}× more energy than the simulated asteroid impact.",
                1.0 / self.ratio
            )
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let energy = if self.energy_mt < 0.01 {
            format!("{:.2e}", self.energy_mt)
        } else {
            format!("{:.3}", self.energy_mt)
        };
        vec![
            format!("Magnitude {:.1} earthquake", self.magnitude),
            format!(
                "{:.0} km {} · {}",
                self.distance_km, self.direction, self.place
            ),
            self.timestamp.short_date(),
            format!("Earthquake energy: {energy} MT TNT"),
            self.comparison_text(),
        ]
    }
}

/// Seismic conditions section.
pub fn seismic_lines(profile: Option<&SeismicProfile>) -> Vec<String> {
    let Some(profile) = profile.filter(|p| p.has_data()) else {
        return vec![SEISMIC_UNAVAILABLE.to_string()];
    };
    let g = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), |v| format!("{v:.3}g"));
    vec![
        format!(
            "Category {} - {}",
            profile.sdc.as_deref().unwrap_or("N/A"),
            design_category_description(profile.sdc.as_deref())
        ),
        format!("Peak Ground Acceleration: {}", g(profile.pgam)),
        format!("Short-Period Response (SDS): {}", g(profile.sds)),
        format!("1-Second Response (SD1): {}", g(profile.sd1)),
    ]
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub site: LatLon,
    pub result: SimulationResult,
    pub radii: FootprintRadii,
    pub zoom: u8,
    pub seismic_modifier: f64,
    pub adjusted_crater_depth_m: f64,
    pub population_density: f64,
    pub population_auto_fetched: bool,
    pub seismic: Option<SeismicProfile>,
    pub earthquake: Option<EarthquakeComparison>,
    pub neo_name: Option<String>,
}

impl RunReport {
    pub fn result_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.neo_name {
            lines.push(format!("Using NASA NEO Data: {name}"));
        }

        let r = &self.result;
        lines.push(format!(
            "Crater Diameter: {:.0} m ({:.2} km)",
            r.crater_d_m,
            r.crater_d_m / 1000.0
        ));
        let mut depth = format!("Crater Depth: {:.0} m", self.adjusted_crater_depth_m);
        if self.seismic_modifier > 1.0 {
            depth.push_str(&format!(
                " (+{:.1}% due to ground instability)",
                (self.seismic_modifier - 1.0) * 100.0
            ));
        }
        lines.push(depth);
        lines.push(format!("Impact Speed: {} mph", format_locale(r.velocity_mph)));
        lines.push(format!("Energy Released: {} MT TNT", format_locale(r.energy_mt)));
        lines.push(format!("Fireball Radius: {:.2} km", self.radii.fireball_km));
        lines.push(format!("Shockwave Radius: {:.2} km", self.radii.shockwave_km));

        let mut population = format!(
            "Population Density: {} /km²",
            format_locale(self.population_density)
        );
        if self.population_auto_fetched {
            population.push_str(" (auto-fetched from WorldPop)");
        }
        lines.push(population);
        lines.push(format!(
            "Population Impact: {}",
            format_locale(r.vaporized_population)
        ));
        if !r.summary_text.is_empty() {
            lines.push(r.summary_text.clone());
        }
        lines
    }

    pub fn earthquake_lines(&self) -> Vec<String> {
        self.earthquake
            .as_ref()
            .map_or_else(|| vec![NO_EARTHQUAKES.to_string()], EarthquakeComparison::lines)
    }

    /// The whole panel, one section per paragraph.
    pub fn render(&self) -> String {
        [
            self.result_lines(),
            seismic_lines(self.seismic.as_ref()),
            self.earthquake_lines(),
        ]
        .iter()
        .map(|section| section.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{EarthquakeComparison, NO_EARTHQUAKES, RunReport, SEISMIC_UNAVAILABLE, seismic_lines};
    use crate::backend::SimulationResult;
    use feeds::{EarthquakeRecord, SeismicProfile};
    use foundation::math::LatLon;
    use foundation::time::Timestamp;
    use layers::FootprintRadii;
    use pretty_assertions::assert_eq;

    fn quake(magnitude: f64, place: Option<&str>) -> EarthquakeRecord {
        EarthquakeRecord {
            magnitude,
            place: place.map(str::to_string),
            timestamp: Timestamp(1_704_458_040_000),
            latitude: 35.0,
            longitude: -118.0,
        }
    }

    fn report() -> RunReport {
        RunReport {
            site: LatLon::new(34.0, -118.0),
            result: SimulationResult {
                crater_d_m: 1000.0,
                crater_depth_m: 200.0,
                velocity_mph: 44_738.7,
                energy_mt: 75_000.0,
                vaporized_population: 1234.0,
                summary_text: "Regional devastation.".to_string(),
            },
            radii: FootprintRadii::from_crater_diameter_m(1000.0),
            zoom: 12,
            seismic_modifier: 1.0,
            adjusted_crater_depth_m: 200.0,
            population_density: 100.0,
            population_auto_fetched: false,
            seismic: None,
            earthquake: None,
            neo_name: None,
        }
    }

    #[test]
    fn result_lines_follow_the_panel_layout() {
        assert_eq!(
            report().result_lines(),
            vec![
                "Crater Diameter: 1000 m (1.00 km)",
                "Crater Depth: 200 m",
                "Impact Speed: 44,738.7 mph",
                "Energy Released: 75,000 MT TNT",
                "Fireball Radius: 1.50 km",
                "Shockwave Radius: 4.00 km",
                "Population Density: 100 /km²",
                "Population Impact: 1,234",
                "Regional devastation.",
            ]
        );
    }

    #[test]
    fn notes_appear_when_they_apply() {
        let mut report = report();
        report.seismic_modifier = 1.075;
        report.adjusted_crater_depth_m = 215.0;
        report.population_auto_fetched = true;
        report.neo_name = Some("433 Eros (A898 PA)".to_string());
        let lines = report.result_lines();
        assert_eq!(lines[0], "Using NASA NEO Data: 433 Eros (A898 PA)");
        assert_eq!(lines[2], "Crater Depth: 215 m (+7.5% due to ground instability)");
        assert_eq!(
            lines[7],
            "Population Density: 100 /km² (auto-fetched from WorldPop)"
        );
    }

    #[test]
    fn seismic_section_without_data() {
        assert_eq!(seismic_lines(None), vec![SEISMIC_UNAVAILABLE]);
        let empty = SeismicProfile {
            pgam: None,
            sdc: None,
            sds: Some(0.4),
            sd1: None,
            site: LatLon::new(0.0, 0.0),
        };
        assert_eq!(seismic_lines(Some(&empty)), vec![SEISMIC_UNAVAILABLE]);
    }

    #[test]
    fn seismic_section_formats_accelerations() {
        let profile = SeismicProfile {
            pgam: Some(0.9123),
            sdc: Some("D".to_string()),
            sds: None,
            sd1: Some(0.6),
            site: LatLon::new(34.0, -118.0),
        };
        assert_eq!(
            seismic_lines(Some(&profile)),
            vec![
                "Category D - High seismic risk",
                "Peak Ground Acceleration: 0.912g",
                "Short-Period Response (SDS): N/A",
                "1-Second Response (SD1): 0.600g",
            ]
        );
    }

    #[test]
    fn earthquake_comparison_describes_the_strongest_event() {
        let records = vec![quake(4.0, None), quake(7.0, Some("10 km N of Somewhere, CA"))];
        let site = LatLon::new(34.0, -118.0);
        let cmp = EarthquakeComparison::strongest_of(75_000.0, &records, site).expect("some");
        let lines = cmp.lines();
        assert_eq!(lines[0], "Magnitude 7.0 earthquake");
        assert_eq!(lines[1], "111 km N · 10 km N of Somewhere, CA");
        assert_eq!(lines[2], "Jan 5, 2024");
        assert_eq!(lines[3], "Earthquake energy: 0.477 MT TNT");
        assert!(lines[4].starts_with("The asteroid impact releases "));
    }

    #[test]
    fn comparison_direction_follows_the_energy_ratio() {
        let cmp = EarthquakeComparison::new(
            0.1,
            &quake(4.0, None),
            LatLon::new(35.0, -118.0),
        );
        assert_eq!(cmp.place, "Unknown location");
        assert_eq!(cmp.direction, "near");
        assert!(cmp.lines()[3].contains("e-"));
        assert_eq!(
            cmp.comparison_text(),
            "The asteroid impact releases 6631.2× more energy than this earthquake."
        );

        let cmp = EarthquakeComparison::new(0.01, &quake(7.0, None), LatLon::new(35.0, -118.0));
        assert_eq!(
            cmp.comparison_text(),
            "This earthquake released 47.7× more energy than the simulated asteroid impact."
        );
    }

    #[test]
    fn no_earthquakes_text() {
        assert_eq!(report().earthquake_lines(), vec![NO_EARTHQUAKES]);
        assert!(report().render().contains(SEISMIC_UNAVAILABLE));
    }
}
