use foundation::math::{LatLon, circle_polygon};
use serde_json::{Value, json};

use crate::layer::SourceShape;

/// Vertices per footprint circle (the ring closes with one extra vertex).
pub const FOOTPRINT_STEPS: usize = 128;

/// Fireball radius relative to the crater radius.
pub const FIREBALL_FACTOR: f64 = 3.0;

/// Shockwave radius relative to the crater radius.
pub const SHOCKWAVE_FACTOR: f64 = 8.0;

/// Footprint radii in kilometers, all derived from the crater diameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FootprintRadii {
    pub crater_km: f64,
    pub fireball_km: f64,
    pub shockwave_km: f64,
}

impl FootprintRadii {
    pub fn from_crater_diameter_m(crater_d_m: f64) -> Self {
        let crater_km = crater_d_m / 2.0 / 1000.0;
        Self {
            crater_km,
            fireball_km: crater_km * FIREBALL_FACTOR,
            shockwave_km: crater_km * SHOCKWAVE_FACTOR,
        }
    }
}

/// GeoJSON polygon feature approximating a circle on the sphere.
pub fn circle_feature(center: LatLon, radius_km: f64) -> Value {
    let ring: Vec<[f64; 2]> = circle_polygon(center, radius_km, FOOTPRINT_STEPS)
        .into_iter()
        .map(LatLon::to_lon_lat)
        .collect();
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {"type": "Polygon", "coordinates": [ring]}
    })
}

/// Single-point feature collection marking the impact site.
pub fn point_collection(site: LatLon) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": site.to_lon_lat()}
        }]
    })
}

/// Source data for one overlay source shape.
pub fn source_data(shape: SourceShape, site: LatLon, radii: &FootprintRadii) -> Value {
    match shape {
        SourceShape::Shockwave => circle_feature(site, radii.shockwave_km),
        SourceShape::Fireball => circle_feature(site, radii.fireball_km),
        SourceShape::Crater => circle_feature(site, radii.crater_km),
        SourceShape::ImpactPoint => point_collection(site),
    }
}

#[cfg(test)]
mod tests {
    use super::{FootprintRadii, circle_feature, point_collection};
    use foundation::math::{LatLon, haversine_distance_km};

    #[test]
    fn radii_scale_from_crater() {
        let r = FootprintRadii::from_crater_diameter_m(1000.0);
        assert_eq!(r.crater_km, 0.5);
        assert_eq!(r.fireball_km, 1.5);
        assert_eq!(r.shockwave_km, 4.0);
    }

    #[test]
    fn circle_feature_is_a_closed_ring() {
        let site = LatLon::new(34.0, -118.0);
        let feature = circle_feature(site, 4.0);
        let ring = feature["geometry"]["coordinates"][0]
            .as_array()
            .expect("ring");
        assert_eq!(ring.len(), 129);
        assert_eq!(ring.first(), ring.last());

        let lon = ring[10][0].as_f64().expect("lon");
        let lat = ring[10][1].as_f64().expect("lat");
        let d = haversine_distance_km(site.lat, site.lon, lat, lon);
        assert!((d - 4.0).abs() < 1e-6, "{d}");
    }

    #[test]
    fn point_uses_lon_lat_order() {
        let v = point_collection(LatLon::new(34.0, -118.0));
        assert_eq!(v["features"][0]["geometry"]["coordinates"][0], -118.0);
        assert_eq!(v["features"][0]["geometry"]["coordinates"][1], 34.0);
    }
}
