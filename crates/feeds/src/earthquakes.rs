use foundation::math::LatLon;
use foundation::time::Timestamp;
use serde::Deserialize;
use serde_json::Value;

/// Default search radius around an impact site.
pub const DEFAULT_RADIUS_KM: f64 = 500.0;
/// Default number of events requested.
pub const DEFAULT_LIMIT: u32 = 5;

/// Parameters of a historical-seismicity lookup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EarthquakeQuery {
    pub radius_km: f64,
    pub limit: u32,
}

impl Default for EarthquakeQuery {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One historical event from the seismicity catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeRecord {
    pub magnitude: f64,
    pub place: Option<String>,
    pub timestamp: Timestamp,
    pub latitude: f64,
    pub longitude: f64,
}

impl EarthquakeRecord {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
    #[serde(default)]
    geometry: Option<FeatureGeometry>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FeatureGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

/// Reads the catalog's GeoJSON feature collection, preserving source order.
///
/// Features without a magnitude or a `[lon, lat, ...]` position are skipped.
pub fn parse_earthquakes(body: &Value) -> Vec<EarthquakeRecord> {
    let Ok(collection) = FeatureCollection::deserialize(body) else {
        return Vec::new();
    };

    collection
        .features
        .into_iter()
        .filter_map(|f| {
            let props = f.properties?;
            let coords = f.geometry?.coordinates;
            let (&lon, &lat) = (coords.first()?, coords.get(1)?);
            Some(EarthquakeRecord {
                magnitude: props.mag?,
                place: props.place.filter(|p| !p.trim().is_empty()),
                timestamp: Timestamp::from_millis(props.time.unwrap_or(0)),
                latitude: lat,
                longitude: lon,
            })
        })
        .collect()
}

/// Highest-magnitude record; the earliest-listed one wins ties.
pub fn strongest(records: &[EarthquakeRecord]) -> Option<&EarthquakeRecord> {
    let mut best: Option<&EarthquakeRecord> = None;
    for record in records {
        match best {
            Some(b) if record.magnitude <= b.magnitude => {}
            _ => best = Some(record),
        }
    }
    best
}
