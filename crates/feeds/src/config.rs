use std::env;

pub const DEFAULT_WORLDPOP_IDENTIFY_URL: &str = "https://worldpop.arcgis.com/arcgis/rest/services/WorldPop_Population_Density_100m/ImageServer/identify";
pub const DEFAULT_USGS_DESIGNMAPS_URL: &str =
    "https://earthquake.usgs.gov/ws/designmaps/asce7-22.json";
pub const DEFAULT_USGS_FDSN_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
pub const DEFAULT_NASA_NEOWS_URL: &str = "https://api.nasa.gov/neo/rest/v1";
pub const DEFAULT_NASA_API_KEY: &str = "DEMO_KEY";

/// Base URLs of the external feeds plus the catalog API key.
#[derive(Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    pub worldpop_identify: String,
    pub usgs_designmaps: String,
    pub usgs_fdsn: String,
    pub nasa_neows: String,
    pub nasa_api_key: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            worldpop_identify: DEFAULT_WORLDPOP_IDENTIFY_URL.to_string(),
            usgs_designmaps: DEFAULT_USGS_DESIGNMAPS_URL.to_string(),
            usgs_fdsn: DEFAULT_USGS_FDSN_URL.to_string(),
            nasa_neows: DEFAULT_NASA_NEOWS_URL.to_string(),
            nasa_api_key: DEFAULT_NASA_API_KEY.to_string(),
        }
    }
}

impl FeedEndpoints {
    /// Reads `WORLDPOP_IDENTIFY_URL`, `USGS_DESIGNMAPS_URL`, `USGS_FDSN_URL`,
    /// `NASA_NEOWS_URL` and `NASA_API_KEY`, falling back to the public services.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            worldpop_identify: env_string("WORLDPOP_IDENTIFY_URL", defaults.worldpop_identify),
            usgs_designmaps: env_string("USGS_DESIGNMAPS_URL", defaults.usgs_designmaps),
            usgs_fdsn: env_string("USGS_FDSN_URL", defaults.usgs_fdsn),
            nasa_neows: env_string("NASA_NEOWS_URL", defaults.nasa_neows),
            nasa_api_key: env_string("NASA_API_KEY", defaults.nasa_api_key),
        }
    }

    /// Points every feed at one base URL (mock servers in tests).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            worldpop_identify: format!("{base}/worldpop/identify"),
            usgs_designmaps: format!("{base}/designmaps/asce7-22.json"),
            usgs_fdsn: format!("{base}/fdsnws/event/1/query"),
            nasa_neows: format!("{base}/neo/rest/v1"),
            nasa_api_key: DEFAULT_NASA_API_KEY.to_string(),
        }
    }
}

// The key is a credential; keep it out of debug output.
impl std::fmt::Debug for FeedEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedEndpoints")
            .field("worldpop_identify", &self.worldpop_identify)
            .field("usgs_designmaps", &self.usgs_designmaps)
            .field("usgs_fdsn", &self.usgs_fdsn)
            .field("nasa_neows", &self.nasa_neows)
            .field("nasa_api_key", &"<redacted>")
            .finish()
    }
}

pub fn env_string(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

pub fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
