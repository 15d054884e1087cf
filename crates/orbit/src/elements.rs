use std::f64::consts::TAU;

use feeds::OrbitalElements;
use foundation::math::Vec3;

/// Scene units per astronomical unit.
pub const AU_SCALE: f64 = 5.0;
/// Segments of the sampled asteroid orbit.
pub const ORBIT_PATH_STEPS: usize = 128;
/// Radius of the Earth reference orbit in scene units (1 AU).
pub const EARTH_ORBIT_RADIUS: f64 = 5.0;
pub const EARTH_PATH_STEPS: usize = 64;
/// Earth's angular rate relative to the asteroid's.
pub const EARTH_ANGLE_RATIO: f64 = 0.3;
/// Anomaly advance per animation frame (radians).
pub const ANGLE_STEP: f64 = 0.005;

pub const DEFAULT_SEMI_MAJOR_AXIS_AU: f64 = 1.5;
pub const DEFAULT_ECCENTRICITY: f64 = 0.2;
pub const DEFAULT_INCLINATION_DEG: f64 = 5.0;
pub const DEFAULT_PERIHELION_AU: f64 = 1.0;
pub const DEFAULT_APHELION_AU: f64 = 2.0;

/// Orbital elements of the previewed object with display defaults applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitParameters {
    pub semi_major_axis_au: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub perihelion_au: f64,
    pub aphelion_au: f64,
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Self {
            semi_major_axis_au: DEFAULT_SEMI_MAJOR_AXIS_AU,
            eccentricity: DEFAULT_ECCENTRICITY,
            inclination_deg: DEFAULT_INCLINATION_DEG,
            perihelion_au: DEFAULT_PERIHELION_AU,
            aphelion_au: DEFAULT_APHELION_AU,
        }
    }
}

impl OrbitParameters {
    /// Missing, zero or non-finite elements fall back to the defaults.
    pub fn from_elements(elements: Option<&OrbitalElements>) -> Self {
        let defaults = Self::default();
        let Some(el) = elements else {
            return defaults;
        };
        let pick = |v: Option<f64>, d: f64| v.filter(|x| x.is_finite() && *x != 0.0).unwrap_or(d);
        Self {
            semi_major_axis_au: pick(el.semi_major_axis_au, defaults.semi_major_axis_au),
            eccentricity: pick(el.eccentricity, defaults.eccentricity),
            inclination_deg: pick(el.inclination_deg, defaults.inclination_deg),
            perihelion_au: pick(el.perihelion_au, defaults.perihelion_au),
            aphelion_au: pick(el.aphelion_au, defaults.aphelion_au),
        }
    }
}

/// Sun-centred ellipse in scene units, tilted about the x axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitEllipse {
    /// Semi-major axis.
    pub a: f64,
    /// Semi-minor axis.
    pub b: f64,
    /// Centre-to-focus distance.
    pub c: f64,
    pub inclination_rad: f64,
}

impl OrbitEllipse {
    /// Eccentricities at or above 1 degenerate to a line segment (`b = 0`).
    pub fn from_elements(semi_major_axis_au: f64, eccentricity: f64, inclination_deg: f64) -> Self {
        let a = semi_major_axis_au * AU_SCALE;
        let e = eccentricity;
        Self {
            a,
            b: a * (1.0 - e * e).max(0.0).sqrt(),
            c: a * e,
            inclination_rad: inclination_deg.to_radians(),
        }
    }

    pub fn from_parameters(params: &OrbitParameters) -> Self {
        Self::from_elements(
            params.semi_major_axis_au,
            params.eccentricity,
            params.inclination_deg,
        )
    }

    /// Position at parametric angle `theta` (radians); the Sun sits at a focus.
    pub fn point_at(&self, theta: f64) -> Vec3 {
        let x = self.a * theta.cos() - self.c;
        let z = self.b * theta.sin();
        let (sin_i, cos_i) = self.inclination_rad.sin_cos();
        Vec3::new(x, z * sin_i, z * cos_i)
    }

    /// `steps + 1` samples over one revolution; first == last.
    pub fn path(&self, steps: usize) -> Vec<Vec3> {
        (0..=steps)
            .map(|i| self.point_at(i as f64 / steps as f64 * TAU))
            .collect()
    }
}

/// Earth on its reference circle when the asteroid is at `angle`.
pub fn earth_position(angle: f64) -> Vec3 {
    let earth_angle = angle * EARTH_ANGLE_RATIO;
    Vec3::new(
        earth_angle.cos() * EARTH_ORBIT_RADIUS,
        0.0,
        earth_angle.sin() * EARTH_ORBIT_RADIUS,
    )
}

/// Earth's reference orbit, `EARTH_PATH_STEPS + 1` samples.
pub fn earth_path() -> Vec<Vec3> {
    (0..=EARTH_PATH_STEPS)
        .map(|i| {
            let angle = i as f64 / EARTH_PATH_STEPS as f64 * TAU;
            Vec3::new(
                angle.cos() * EARTH_ORBIT_RADIUS,
                0.0,
                angle.sin() * EARTH_ORBIT_RADIUS,
            )
        })
        .collect()
}
