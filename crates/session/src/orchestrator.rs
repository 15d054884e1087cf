//! Impact-site state machine.
//!
//! ```text
//! Idle --select_site--> SiteSelected --run--> Running --ok--> Rendered
//!                          ^   ^                 |
//!                          |   +----failure------+
//!                          +-----select_site (from any phase)
//! ```
//!
//! Every selection mints a [`SiteToken`]. Lookups and runs capture the token
//! when they start and apply their results only if it is still current.

use std::sync::Arc;

use feeds::{EarthquakeQuery, HttpFeeds, SeismicProfile, SiteDataSource};
use foundation::SiteToken;
use foundation::math::{LatLon, seismic_impact_modifier, zoom_for_footprint};
use layers::{FootprintRadii, MapSurface, OverlayController, OverlayGeneration, SurfaceError};
use parking_lot::Mutex;
use runtime::{Event, EventBus};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, HttpImpactBackend, ImpactBackend, SimulationRequest};
use crate::config::AppConfig;
use crate::neo_browser::NeoSeed;
use crate::params::{FieldError, SimulationParameters, population_slider_value};
use crate::report::{EarthquakeComparison, RunReport};

/// Zoom used when flying to a freshly selected site.
pub const SITE_ZOOM: f64 = 4.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    SiteSelected,
    Running,
    Rendered,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lookup {
    Population,
    Seismic,
    Simulation,
}

/// Session activity, drained by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SiteSelected { token: SiteToken, site: LatLon },
    PopulationArrived { token: SiteToken, density: Option<f64> },
    SeismicArrived { token: SiteToken, available: bool },
    StaleDiscarded { token: SiteToken, lookup: Lookup },
    RunStarted { token: SiteToken },
    RunFailed { token: SiteToken, message: String },
    Rendered { token: SiteToken, crater_d_m: f64 },
    NeoSeeded { name: String },
}

#[derive(Debug)]
pub enum RunError {
    /// At least one parameter is out of range; nothing was sent.
    Invalid(Vec<FieldError>),
    NoSite,
    Backend(BackendError),
    Surface(SurfaceError),
    /// Another site was selected while the run was in flight.
    Superseded,
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Invalid(_) => {
                write!(f, "Please correct the invalid inputs before running the simulation.")
            }
            RunError::NoSite => write!(f, "Please select an impact site on the globe first!"),
            RunError::Backend(_) => write!(f, "Error running simulation."),
            RunError::Surface(e) => write!(f, "overlay update failed: {e}"),
            RunError::Superseded => write!(f, "impact site changed while the simulation ran"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Backend(e) => Some(e),
            RunError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

struct SessionState {
    phase: Phase,
    token: SiteToken,
    site: Option<LatLon>,
    seismic: Option<SeismicProfile>,
    fetched_population: Option<f64>,
    params: SimulationParameters,
    neo_source: Option<String>,
    last_report: Option<RunReport>,
    overlay: OverlayController,
    events: EventBus<SessionEvent>,
    lookups: Vec<JoinHandle<()>>,
}

struct Inner {
    state: Mutex<SessionState>,
    surface: Arc<dyn MapSurface>,
    feeds: Arc<dyn SiteDataSource>,
    backend: Arc<dyn ImpactBackend>,
}

/// One user's simulation session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(
        feeds: Arc<dyn SiteDataSource>,
        backend: Arc<dyn ImpactBackend>,
        overlay: OverlayController,
    ) -> Self {
        let surface = Arc::clone(overlay.surface());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState {
                    phase: Phase::Idle,
                    token: SiteToken::NONE,
                    site: None,
                    seismic: None,
                    fetched_population: None,
                    params: SimulationParameters::default(),
                    neo_source: None,
                    last_report: None,
                    overlay,
                    events: EventBus::new(),
                    lookups: Vec::new(),
                }),
                surface,
                feeds,
                backend,
            }),
        }
    }

    /// Session over the live HTTP feeds and backend.
    pub fn from_config(config: &AppConfig, surface: Arc<dyn MapSurface>) -> Self {
        Self::new(
            Arc::new(HttpFeeds::new(config.feeds.clone())),
            Arc::new(HttpImpactBackend::new(config.backend_url.clone())),
            OverlayController::with_pulse_interval(surface, config.pulse_interval),
        )
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.lock().phase
    }

    pub fn token(&self) -> SiteToken {
        self.inner.state.lock().token
    }

    pub fn site(&self) -> Option<LatLon> {
        self.inner.state.lock().site
    }

    pub fn seismic(&self) -> Option<SeismicProfile> {
        self.inner.state.lock().seismic.clone()
    }

    pub fn fetched_population(&self) -> Option<f64> {
        self.inner.state.lock().fetched_population
    }

    pub fn parameters(&self) -> SimulationParameters {
        self.inner.state.lock().params
    }

    pub fn set_parameters(&self, params: SimulationParameters) {
        self.inner.state.lock().params = params;
    }

    pub fn neo_source(&self) -> Option<String> {
        self.inner.state.lock().neo_source.clone()
    }

    pub fn last_report(&self) -> Option<RunReport> {
        self.inner.state.lock().last_report.clone()
    }

    pub fn overlay_generation(&self) -> Option<OverlayGeneration> {
        self.inner.state.lock().overlay.current().copied()
    }

    pub fn is_pulsing(&self) -> bool {
        self.inner.state.lock().overlay.is_pulsing()
    }

    pub fn drain_events(&self) -> Vec<Event<SessionEvent>> {
        self.inner.state.lock().events.drain()
    }

    /// Makes `site` the impact site and starts its population and seismic
    /// lookups. Must run inside a tokio runtime.
    ///
    /// Lookups still running for an earlier site keep running; their results
    /// are discarded on arrival.
    pub fn select_site(&self, site: LatLon) -> SiteToken {
        let token = {
            let mut state = self.inner.state.lock();
            let token = state.token.next();
            state.token = token;
            state.site = Some(site);
            state.seismic = None;
            state.fetched_population = None;
            state.phase = Phase::SiteSelected;
            state.lookups.retain(|handle| !handle.is_finished());
            state.events.emit(SessionEvent::SiteSelected { token, site });
            token
        };
        info!("impact site {site} selected (token {})", token.value());

        self.inner.surface.set_site_marker(Some(site));
        self.inner.surface.fly_to(site, SITE_ZOOM);

        let population = {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                let density = inner.feeds.population_density(site).await;
                inner.apply_population(token, density);
            })
        };
        let seismic = {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                let profile = inner.feeds.seismic_design_values(site).await;
                inner.apply_seismic(token, profile);
            })
        };
        self.inner
            .state
            .lock()
            .lookups
            .extend([population, seismic]);
        token
    }

    /// Waits until every site lookup spawned so far has resolved.
    pub async fn settle_lookups(&self) {
        let handles = std::mem::take(&mut self.inner.state.lock().lookups);
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("site lookup task ended abnormally: {e}");
            }
        }
    }

    /// Writes a catalog object's size and speed into the parameters.
    pub fn apply_neo_seed(&self, seed: &NeoSeed) {
        let mut state = self.inner.state.lock();
        state.params.diameter_km = seed.diameter_km;
        state.params.velocity_km_s = seed.velocity_km_s;
        state.neo_source = Some(seed.name.clone());
        state.events.emit(SessionEvent::NeoSeeded {
            name: seed.name.clone(),
        });
        info!(
            "parameters seeded from {} ({:.3} km, {:.2} km/s)",
            seed.name, seed.diameter_km, seed.velocity_km_s
        );
    }

    /// Validates the parameters, runs the simulation for the current site
    /// and redraws the overlay.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let (token, site, request, auto_fetched) = {
            let mut state = self.inner.state.lock();
            if let Err(errors) = state.params.validate() {
                let token = state.token;
                state.events.emit(SessionEvent::RunFailed {
                    token,
                    message: RunError::Invalid(Vec::new()).to_string(),
                });
                return Err(RunError::Invalid(errors));
            }
            let Some(site) = state.site else {
                return Err(RunError::NoSite);
            };

            let fetched = state.fetched_population.filter(|d| *d > 0.0);
            let mut params = state.params;
            if let Some(density) = fetched {
                params.population_density_per_km2 = density;
            }

            let token = state.token;
            state.phase = Phase::Running;
            // A new request ends the previous pulse even if it then fails.
            state.overlay.stop_pulse();
            state.events.emit(SessionEvent::RunStarted { token });
            (
                token,
                site,
                SimulationRequest::new(&params, site),
                fetched.is_some(),
            )
        };
        info!("running simulation at {site} (token {})", token.value());
        self.inner.surface.set_site_marker(None);

        let population_density = request.population_density_per_km2;
        let (outcome, earthquakes) = tokio::join!(
            self.inner.backend.simulate(request),
            self.inner
                .feeds
                .nearby_earthquakes(site, EarthquakeQuery::default()),
        );

        let mut state = self.inner.state.lock();
        if state.token != token {
            debug!("simulation for superseded site {site} discarded");
            state.events.emit(SessionEvent::StaleDiscarded {
                token,
                lookup: Lookup::Simulation,
            });
            return Err(RunError::Superseded);
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                error!("simulation failed: {e}");
                state.phase = Phase::SiteSelected;
                state.events.emit(SessionEvent::RunFailed {
                    token,
                    message: e.to_string(),
                });
                return Err(RunError::Backend(e));
            }
        };

        let seismic_modifier =
            seismic_impact_modifier(state.seismic.as_ref().and_then(|s| s.pgam));
        let radii = FootprintRadii::from_crater_diameter_m(result.crater_d_m);
        if let Err(e) = state.overlay.draw_overlay(site, radii) {
            state.phase = Phase::SiteSelected;
            state.events.emit(SessionEvent::RunFailed {
                token,
                message: e.to_string(),
            });
            return Err(RunError::Surface(e));
        }

        let zoom = zoom_for_footprint(result.crater_d_m);
        self.inner.surface.fly_to(site, f64::from(zoom));

        let report = RunReport {
            site,
            radii,
            zoom,
            seismic_modifier,
            adjusted_crater_depth_m: result.crater_depth_m * seismic_modifier,
            population_density,
            population_auto_fetched: auto_fetched,
            seismic: state.seismic.clone(),
            earthquake: EarthquakeComparison::strongest_of(result.energy_mt, &earthquakes, site),
            neo_name: state.neo_source.clone(),
            result,
        };
        state.phase = Phase::Rendered;
        state.last_report = Some(report.clone());
        state.events.emit(SessionEvent::Rendered {
            token,
            crater_d_m: report.result.crater_d_m,
        });
        info!(
            "simulation rendered: crater {:.0} m, zoom {zoom}",
            report.result.crater_d_m
        );
        Ok(report)
    }
}

impl Inner {
    fn apply_population(&self, token: SiteToken, density: Option<f64>) {
        let mut state = self.state.lock();
        if state.token != token {
            debug!("population density for superseded site discarded");
            state.events.emit(SessionEvent::StaleDiscarded {
                token,
                lookup: Lookup::Population,
            });
            return;
        }
        state.fetched_population = density;
        match density {
            Some(d) => {
                state.params.population_density_per_km2 = population_slider_value(d);
                debug!("population density {d} /km² applied");
            }
            None => warn!("population density unavailable, keeping the manual value"),
        }
        state
            .events
            .emit(SessionEvent::PopulationArrived { token, density });
    }

    fn apply_seismic(&self, token: SiteToken, profile: Option<SeismicProfile>) {
        let mut state = self.state.lock();
        if state.token != token {
            debug!("seismic profile for superseded site discarded");
            state.events.emit(SessionEvent::StaleDiscarded {
                token,
                lookup: Lookup::Seismic,
            });
            return;
        }
        let available = profile.as_ref().is_some_and(SeismicProfile::has_data);
        state.seismic = profile;
        state
            .events
            .emit(SessionEvent::SeismicArrived { token, available });
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookup, Phase, RunError, Session, SessionEvent};
    use crate::backend::{MemoryBackend, SimulationResult};
    use crate::params::SimulationParameters;
    use feeds::{MemoryFeeds, SeismicProfile, SiteLookup};
    use foundation::math::LatLon;
    use layers::{MemorySurface, OverlayController};
    use std::sync::Arc;
    use std::time::Duration;

    fn result(crater_d_m: f64) -> SimulationResult {
        SimulationResult {
            crater_d_m,
            crater_depth_m: 200.0,
            velocity_mph: 44_738.7,
            energy_mt: 75_000.0,
            vaporized_population: 0.0,
            summary_text: String::new(),
        }
    }

    struct Fixture {
        session: Session,
        feeds: Arc<MemoryFeeds>,
        backend: Arc<MemoryBackend>,
        surface: Arc<MemorySurface>,
    }

    fn fixture() -> Fixture {
        let feeds = Arc::new(MemoryFeeds::new());
        let backend = Arc::new(MemoryBackend::returning(result(1000.0)));
        let surface = Arc::new(MemorySurface::new());
        let session = Session::new(
            feeds.clone(),
            backend.clone(),
            OverlayController::new(surface.clone()),
        );
        Fixture {
            session,
            feeds,
            backend,
            surface,
        }
    }

    #[tokio::test]
    async fn run_without_site_is_rejected() {
        let f = fixture();
        assert_eq!(f.session.phase(), Phase::Idle);
        let err = f.session.run().await.expect_err("no site");
        assert!(matches!(err, RunError::NoSite));
        assert_eq!(err.to_string(), "Please select an impact site on the globe first!");
        assert!(f.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn invalid_parameters_never_reach_the_backend() {
        let f = fixture();
        f.session.select_site(LatLon::new(0.0, 0.0));
        f.session.set_parameters(SimulationParameters {
            angle_deg: 120.0,
            ..SimulationParameters::default()
        });
        let err = f.session.run().await.expect_err("invalid");
        assert!(matches!(err, RunError::Invalid(ref fields) if fields.len() == 1));
        assert!(f.backend.requests().is_empty());
        assert_eq!(f.session.phase(), Phase::SiteSelected);
    }

    #[tokio::test]
    async fn fetched_population_wins_over_the_manual_value() {
        let f = fixture();
        f.feeds.set_population(Some(25_000.0));
        f.session.select_site(LatLon::new(40.7, -74.0));
        f.session.settle_lookups().await;

        assert_eq!(f.session.fetched_population(), Some(25_000.0));
        assert_eq!(f.session.parameters().population_density_per_km2, 10_000.0);

        let report = f.session.run().await.expect("run");
        assert_eq!(f.backend.requests()[0].population_density_per_km2, 25_000.0);
        assert!(report.population_auto_fetched);
    }

    #[tokio::test]
    async fn seismic_profile_deepens_the_crater() {
        let f = fixture();
        f.feeds.set_seismic(Some(unstable_ground()));
        f.session.select_site(LatLon::new(34.0, -118.0));
        f.session.settle_lookups().await;

        let report = f.session.run().await.expect("run");
        assert!((report.seismic_modifier - 1.075).abs() < 1e-12);
        assert!((report.adjusted_crater_depth_m - 215.0).abs() < 1e-9);
    }

    fn unstable_ground() -> SeismicProfile {
        SeismicProfile {
            pgam: Some(0.5),
            sdc: Some("D".to_string()),
            sds: None,
            sd1: None,
            site: LatLon::new(0.0, 0.0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn population_applies_while_seismic_is_pending() {
        let f = fixture();
        f.feeds.set_population(Some(800.0));
        f.feeds.set_seismic(Some(unstable_ground()));
        f.feeds
            .set_lookup_delay(SiteLookup::Seismic, Duration::from_secs(5));

        let token = f.session.select_site(LatLon::new(48.9, 2.35));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(f.session.fetched_population(), Some(800.0));
        assert_eq!(f.session.parameters().population_density_per_km2, 800.0);
        assert!(f.session.seismic().is_none());
        let events: Vec<SessionEvent> = f
            .session
            .drain_events()
            .into_iter()
            .map(|e| e.payload)
            .collect();
        assert!(events.contains(&SessionEvent::PopulationArrived {
            token,
            density: Some(800.0),
        }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::SeismicArrived { .. })));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(f.session.seismic().is_some());
        let events: Vec<SessionEvent> = f
            .session
            .drain_events()
            .into_iter()
            .map(|e| e.payload)
            .collect();
        assert_eq!(
            events,
            vec![SessionEvent::SeismicArrived {
                token,
                available: true,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_before_seismic_arrives_uses_no_modifier() {
        let f = fixture();
        f.feeds.set_seismic(Some(unstable_ground()));
        f.feeds
            .set_lookup_delay(SiteLookup::Seismic, Duration::from_secs(5));
        f.session.select_site(LatLon::new(35.7, 139.7));

        let report = f.session.run().await.expect("run");
        assert_eq!(report.seismic_modifier, 1.0);
        assert_eq!(report.adjusted_crater_depth_m, 200.0);
        assert!(report.seismic.is_none());

        f.session.settle_lookups().await;
        assert!(f.session.seismic().is_some());
        assert_eq!(f.session.phase(), Phase::Rendered);
        assert_eq!(
            f.session.last_report().map(|r| r.seismic_modifier),
            Some(1.0)
        );
    }

    #[tokio::test]
    async fn backend_failure_leaves_overlays_alone() {
        let f = fixture();
        let site = LatLon::new(10.0, 10.0);
        f.session.select_site(site);
        f.session.run().await.expect("first run");
        let drawn = f.surface.layer_ids();
        let generation = f.session.overlay_generation();
        assert!(f.session.is_pulsing());

        f.backend.push_failure("HTTP 500");
        let err = f.session.run().await.expect_err("failure");
        assert!(matches!(err, RunError::Backend(_)));
        assert_eq!(err.to_string(), "Error running simulation.");
        assert_eq!(f.surface.layer_ids(), drawn);
        assert_eq!(f.session.overlay_generation(), generation);
        assert!(!f.session.is_pulsing());
        assert_eq!(f.session.phase(), Phase::SiteSelected);
    }

    #[tokio::test(start_paused = true)]
    async fn late_lookup_for_an_old_site_is_discarded() {
        let f = fixture();
        let old = LatLon::new(1.0, 1.0);
        let new = LatLon::new(2.0, 2.0);
        f.feeds.set_population(Some(500.0));
        f.feeds.set_site_delay(old, Duration::from_secs(5));

        let old_token = f.session.select_site(old);
        let new_token = f.session.select_site(new);
        f.session.settle_lookups().await;

        assert_eq!(f.session.site(), Some(new));
        let events: Vec<SessionEvent> = f
            .session
            .drain_events()
            .into_iter()
            .map(|e| e.payload)
            .collect();
        assert!(events.contains(&SessionEvent::PopulationArrived {
            token: new_token,
            density: Some(500.0),
        }));
        assert!(events.contains(&SessionEvent::StaleDiscarded {
            token: old_token,
            lookup: Lookup::Population,
        }));
        assert!(events.contains(&SessionEvent::StaleDiscarded {
            token: old_token,
            lookup: Lookup::Seismic,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_run_does_not_touch_overlays() {
        let f = fixture();
        f.backend.set_delay(Some(Duration::from_secs(2)));
        f.session.select_site(LatLon::new(5.0, 5.0));

        let running = {
            let session = f.session.clone();
            tokio::spawn(async move { session.run().await })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        f.session.select_site(LatLon::new(6.0, 6.0));

        let outcome = running.await.expect("join");
        assert!(matches!(outcome, Err(RunError::Superseded)));
        assert!(f.surface.layer_ids().is_empty());
        assert_eq!(f.session.phase(), Phase::SiteSelected);
        assert!(f.session.last_report().is_none());
    }

    #[tokio::test]
    async fn selection_marks_and_run_clears_the_site_marker() {
        let f = fixture();
        let site = LatLon::new(-33.9, 151.2);
        f.session.select_site(site);
        assert_eq!(f.surface.marker(), Some(site));
        f.session.run().await.expect("run");
        assert_eq!(f.surface.marker(), None);
        assert_eq!(f.session.phase(), Phase::Rendered);
    }
}
