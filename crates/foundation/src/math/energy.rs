/// Joules in one megaton of TNT.
pub const JOULES_PER_MEGATON: f64 = 4.184e15;

/// Upper bound on the PGA value that still increases the seismic modifier.
pub const SEISMIC_PGA_CAP: f64 = 1.0;

/// Maximum fractional crater-depth amplification from ground instability.
pub const SEISMIC_MAX_AMPLIFICATION: f64 = 0.15;

pub fn joules_to_megatons(joules: f64) -> f64 {
    joules / JOULES_PER_MEGATON
}

pub fn megatons_to_joules(megatons: f64) -> f64 {
    megatons * JOULES_PER_MEGATON
}

/// Radiated seismic energy of a quake of `magnitude`, in megatons TNT.
///
/// Gutenberg-Richter energy relation `E = 10^(1.5 M + 4.8)` joules. Defined for
/// any real magnitude; no clamping.
pub fn earthquake_energy_mt(magnitude: f64) -> f64 {
    joules_to_megatons(10f64.powf(1.5 * magnitude + 4.8))
}

/// Crater-depth multiplier derived from peak ground acceleration (g).
///
/// `None` (and a zero PGA, which the design-value service uses for "no data")
/// yields `1.0`. Amplification saturates at 15%.
pub fn seismic_impact_modifier(pgam: Option<f64>) -> f64 {
    match pgam {
        Some(pga) if pga != 0.0 && pga.is_finite() => {
            1.0 + pga.min(SEISMIC_PGA_CAP) * SEISMIC_MAX_AMPLIFICATION
        }
        _ => 1.0,
    }
}
