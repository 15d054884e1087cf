use foundation::math::LatLon;
use serde::Deserialize;
use serde_json::Value;

/// Site-specific seismic design values (ASCE 7-22, risk category II, site class C).
///
/// Only meaningful for `site`; a new impact site needs a fresh lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicProfile {
    /// Peak ground acceleration, site-adjusted (g).
    pub pgam: Option<f64>,
    /// Seismic design category, `A` through `F`.
    pub sdc: Option<String>,
    /// Short-period design spectral acceleration (g).
    pub sds: Option<f64>,
    /// 1-second design spectral acceleration (g).
    pub sd1: Option<f64>,
    pub site: LatLon,
}

impl SeismicProfile {
    /// `false` when the service answered but carried neither PGA nor category.
    pub fn has_data(&self) -> bool {
        self.pgam.is_some() || self.sdc.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
struct DesignData {
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    pgam: Option<f64>,
    #[serde(default)]
    sdc: Option<Value>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    sds: Option<f64>,
    #[serde(default, deserialize_with = "crate::json::de_opt_f64")]
    sd1: Option<f64>,
}

/// Reads `response.data.{pgam, sdc, sds, sd1}`.
///
/// Returns `None` when `response.data` is missing or not an object. Zero
/// accelerations and empty categories are the service's "no value" and are
/// normalized to `None`.
pub fn parse_seismic_profile(body: &Value, site: LatLon) -> Option<SeismicProfile> {
    let data = body.get("response")?.get("data")?;
    if !data.is_object() {
        return None;
    }
    let data: DesignData = serde_json::from_value(data.clone()).ok()?;

    let nonzero = |v: Option<f64>| v.filter(|x| *x != 0.0);
    let sdc = match data.sdc {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    };

    Some(SeismicProfile {
        pgam: nonzero(data.pgam),
        sdc,
        sds: nonzero(data.sds),
        sd1: nonzero(data.sd1),
        site,
    })
}

/// Human description of a seismic design category.
pub fn design_category_description(sdc: Option<&str>) -> &'static str {
    match sdc {
        Some("A") => "Minimal seismic risk",
        Some("B") => "Low seismic risk",
        Some("C") => "Moderate seismic risk",
        Some("D") => "High seismic risk",
        Some("E") | Some("F") => "Very high seismic risk",
        _ => "Unknown risk level",
    }
}
