/// Mean Earth radius used for great-circle math (kilometers).
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0;

/// Coordinate delta (degrees) an axis must exceed to count in a cardinal label.
pub const CARDINAL_THRESHOLD_DEG: f64 = 0.5;

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `[lon, lat]` order, as used by GeoJSON positions.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Great-circle distance between two points (degrees in, kilometers out).
pub fn haversine_distance_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    (EARTH_MEAN_RADIUS_KM * c).max(0.0)
}

/// Forward azimuth from A to B in degrees, normalized to `[0, 360)`.
pub fn initial_bearing_deg(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let phi_a = lat_a.to_radians();
    let phi_b = lat_b.to_radians();
    let d_lon = (lon_b - lon_a).to_radians();
    let y = d_lon.sin() * phi_b.cos();
    let x = phi_a.cos() * phi_b.sin() - phi_a.sin() * phi_b.cos() * d_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Point reached by travelling `distance_km` from `origin` along `bearing_deg`.
pub fn destination_point(origin: LatLon, bearing_deg: f64, distance_km: f64) -> LatLon {
    let delta = distance_km / EARTH_MEAN_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    LatLon::new(phi2.to_degrees(), normalize_lon(lambda2.to_degrees()))
}

/// Closed circular ring around `center`: `steps + 1` vertices, first == last.
///
/// Vertices are emitted counter-clockwise starting due north.
pub fn circle_polygon(center: LatLon, radius_km: f64, steps: usize) -> Vec<LatLon> {
    let steps = steps.max(3);
    let mut ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let bearing = -360.0 * i as f64 / steps as f64;
        ring.push(destination_point(center, bearing, radius_km));
    }
    ring.push(ring[0]);
    ring
}

/// Compound direction label of B as seen from A ("N", "SW", ...).
///
/// An axis contributes only when its delta exceeds [`CARDINAL_THRESHOLD_DEG`];
/// returns `"near"` when neither does.
pub fn cardinal_direction(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> String {
    let lat_diff = lat_b - lat_a;
    let lon_diff = lon_b - lon_a;

    let mut direction = String::new();
    if lat_diff.abs() > CARDINAL_THRESHOLD_DEG {
        direction.push(if lat_diff > 0.0 { 'N' } else { 'S' });
    }
    if lon_diff.abs() > CARDINAL_THRESHOLD_DEG {
        direction.push(if lon_diff > 0.0 { 'E' } else { 'W' });
    }

    if direction.is_empty() {
        "near".to_string()
    } else {
        direction
    }
}

fn normalize_lon(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}
