//! Impact-simulation session: site selection, external lookups, backend runs,
//! overlay rendering and the near-Earth-object browser.

pub mod backend;
pub mod config;
pub mod neo_browser;
pub mod orchestrator;
pub mod params;
pub mod report;
pub mod telemetry;

pub use backend::{
    BackendError, HttpImpactBackend, ImpactBackend, MemoryBackend, SimulationRequest,
    SimulationResult,
};
pub use config::AppConfig;
pub use neo_browser::{BrowseError, NeoBrowser, NeoSeed};
pub use orchestrator::{Lookup, Phase, RunError, Session, SessionEvent};
pub use params::{Composition, Field, FieldError, SimulationParameters};
pub use report::{EarthquakeComparison, RunReport};
