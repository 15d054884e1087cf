use std::time::Duration;

use feeds::FeedEndpoints;
use feeds::config::{env_string, env_var_u64};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PULSE_INTERVAL_MS: u64 = 80;
pub const DEFAULT_ORBIT_FRAME_INTERVAL_MS: u64 = 16;

/// Session-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub feeds: FeedEndpoints,
    pub pulse_interval: Duration,
    pub orbit_frame_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            feeds: FeedEndpoints::default(),
            pulse_interval: Duration::from_millis(DEFAULT_PULSE_INTERVAL_MS),
            orbit_frame_interval: Duration::from_millis(DEFAULT_ORBIT_FRAME_INTERVAL_MS),
        }
    }
}

impl AppConfig {
    /// Reads `IMPACT_BACKEND_URL`, `IMPACT_PULSE_INTERVAL_MS`,
    /// `ORBIT_FRAME_INTERVAL_MS` and the feed variables of
    /// [`FeedEndpoints::from_env`].
    pub fn from_env() -> Self {
        Self {
            backend_url: env_string("IMPACT_BACKEND_URL", DEFAULT_BACKEND_URL.to_string()),
            feeds: FeedEndpoints::from_env(),
            pulse_interval: Duration::from_millis(
                env_var_u64("IMPACT_PULSE_INTERVAL_MS", DEFAULT_PULSE_INTERVAL_MS).max(1),
            ),
            orbit_frame_interval: Duration::from_millis(
                env_var_u64("ORBIT_FRAME_INTERVAL_MS", DEFAULT_ORBIT_FRAME_INTERVAL_MS).max(1),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::time::Duration;

    #[test]
    fn defaults_match_the_animation_cadence() {
        let config = AppConfig::default();
        assert_eq!(config.pulse_interval, Duration::from_millis(80));
        assert_eq!(config.orbit_frame_interval, Duration::from_millis(16));
        assert_eq!(config.feeds.nasa_api_key, "DEMO_KEY");
    }
}
