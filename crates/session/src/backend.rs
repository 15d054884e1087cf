//! Impact simulation backend: the crater/energy physics lives behind
//! [`ImpactBackend`].

use std::collections::VecDeque;
use std::time::Duration;

use feeds::BoxFuture;
use foundation::math::LatLon;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::params::SimulationParameters;

/// Body of `POST /simulate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub diameter_km: f64,
    pub velocity_km_s: f64,
    pub angle_deg: f64,
    pub population_density_per_km2: f64,
    pub density_kg_m3: f64,
    pub lat: f64,
    pub lon: f64,
}

impl SimulationRequest {
    pub fn new(params: &SimulationParameters, site: LatLon) -> Self {
        Self {
            diameter_km: params.diameter_km,
            velocity_km_s: params.velocity_km_s,
            angle_deg: params.angle_deg,
            population_density_per_km2: params.population_density_per_km2,
            density_kg_m3: params.density_kg_m3,
            lat: site.lat,
            lon: site.lon,
        }
    }

    pub fn site(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Backend-computed impact result. Extra response fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationResult {
    pub crater_d_m: f64,
    pub crater_depth_m: f64,
    pub velocity_mph: f64,
    pub energy_mt: f64,
    pub vaporized_population: f64,
    #[serde(default)]
    pub summary_text: String,
}

#[derive(Debug)]
pub struct BackendError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

/// Computes crater and energy figures for one parameter set.
pub trait ImpactBackend: Send + Sync {
    fn simulate(
        &self,
        request: SimulationRequest,
    ) -> BoxFuture<'_, Result<SimulationResult, BackendError>>;
}

/// Backend reached over HTTP.
pub struct HttpImpactBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpImpactBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ImpactBackend for HttpImpactBackend {
    fn simulate(
        &self,
        request: SimulationRequest,
    ) -> BoxFuture<'_, Result<SimulationResult, BackendError>> {
        Box::pin(async move {
            let url = format!("{}/simulate", self.base_url.trim_end_matches('/'));
            let resp = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| BackendError::with_source("simulation request failed", e))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(BackendError::new(format!(
                    "simulation backend returned HTTP {status}"
                )));
            }

            resp.json::<SimulationResult>()
                .await
                .map_err(|e| BackendError::with_source("invalid simulation response", e))
        })
    }
}

#[derive(Default)]
struct MemoryBackendState {
    responses: VecDeque<Result<SimulationResult, String>>,
    fallback: Option<SimulationResult>,
    delay: Option<Duration>,
    requests: Vec<SimulationRequest>,
}

/// Scripted backend for tests and offline use.
///
/// Queued responses are consumed first; afterwards every call returns the
/// fallback result, or an error when none is set.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryBackendState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(result: SimulationResult) -> Self {
        let backend = Self::new();
        backend.set_fallback(Some(result));
        backend
    }

    pub fn set_fallback(&self, result: Option<SimulationResult>) {
        self.state.lock().fallback = result;
    }

    pub fn push_result(&self, result: SimulationResult) {
        self.state.lock().responses.push_back(Ok(result));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.state.lock().responses.push_back(Err(message.into()));
    }

    /// Holds every call for `delay` of tokio time before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().delay = delay;
    }

    pub fn requests(&self) -> Vec<SimulationRequest> {
        self.state.lock().requests.clone()
    }
}

impl ImpactBackend for MemoryBackend {
    fn simulate(
        &self,
        request: SimulationRequest,
    ) -> BoxFuture<'_, Result<SimulationResult, BackendError>> {
        Box::pin(async move {
            let delay = {
                let mut state = self.state.lock();
                state.requests.push(request);
                state.delay
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut state = self.state.lock();
            match state.responses.pop_front() {
                Some(Ok(result)) => Ok(result),
                Some(Err(message)) => Err(BackendError::new(message)),
                None => state
                    .fallback
                    .clone()
                    .ok_or_else(|| BackendError::new("no simulation result scripted")),
            }
        })
    }
}
