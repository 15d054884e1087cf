//! In-memory [`SiteDataSource`] for tests and offline use.

use std::collections::HashMap;
use std::time::Duration;

use foundation::math::LatLon;
use parking_lot::Mutex;

use crate::earthquakes::{EarthquakeQuery, EarthquakeRecord};
use crate::seismic::SeismicProfile;
use crate::{BoxFuture, FeedError, NeoDetail, NeoFeed, SiteDataSource};

/// Site lookups that can be held back independently.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SiteLookup {
    Population,
    Seismic,
    Earthquakes,
}

#[derive(Default)]
struct MemoryState {
    population: Option<f64>,
    seismic: Option<SeismicProfile>,
    earthquakes: Vec<EarthquakeRecord>,
    neo_feed: Option<NeoFeed>,
    neo_details: HashMap<String, NeoDetail>,
    site_delays: Vec<(LatLon, Duration)>,
    lookup_delays: HashMap<SiteLookup, Duration>,
    calls: Vec<String>,
}

/// Canned responses, optionally delayed per site and per lookup kind.
///
/// Delays use `tokio::time`, so tests running with paused time control
/// exactly when each lookup resolves.
#[derive(Default)]
pub struct MemoryFeeds {
    state: Mutex<MemoryState>,
}

impl MemoryFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_population(&self, density: Option<f64>) {
        self.state.lock().population = density;
    }

    /// The returned profile is re-anchored to whichever site is queried.
    pub fn set_seismic(&self, profile: Option<SeismicProfile>) {
        self.state.lock().seismic = profile;
    }

    pub fn set_earthquakes(&self, records: Vec<EarthquakeRecord>) {
        self.state.lock().earthquakes = records;
    }

    pub fn set_neo_feed(&self, feed: Option<NeoFeed>) {
        self.state.lock().neo_feed = feed;
    }

    pub fn insert_neo_detail(&self, detail: NeoDetail) {
        self.state.lock().neo_details.insert(detail.id.clone(), detail);
    }

    /// Delays every site lookup at `site` by `delay`.
    pub fn set_site_delay(&self, site: LatLon, delay: Duration) {
        let mut state = self.state.lock();
        state.site_delays.retain(|(s, _)| *s != site);
        state.site_delays.push((site, delay));
    }

    /// Delays every `lookup` by `delay`, on top of any site delay.
    pub fn set_lookup_delay(&self, lookup: SiteLookup, delay: Duration) {
        self.state.lock().lookup_delays.insert(lookup, delay);
    }

    /// Names of the lookups issued so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().calls.push(call.into());
    }

    async fn wait_for(&self, site: LatLon, lookup: SiteLookup) {
        let delay = {
            let state = self.state.lock();
            let at_site = state
                .site_delays
                .iter()
                .find(|(s, _)| *s == site)
                .map(|(_, d)| *d);
            let for_lookup = state.lookup_delays.get(&lookup).copied();
            at_site.unwrap_or_default() + for_lookup.unwrap_or_default()
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl SiteDataSource for MemoryFeeds {
    fn population_density(&self, site: LatLon) -> BoxFuture<'_, Option<f64>> {
        Box::pin(async move {
            self.record(format!("population {site}"));
            self.wait_for(site, SiteLookup::Population).await;
            self.state.lock().population.filter(|d| *d > 0.0)
        })
    }

    fn seismic_design_values(&self, site: LatLon) -> BoxFuture<'_, Option<SeismicProfile>> {
        Box::pin(async move {
            self.record(format!("seismic {site}"));
            self.wait_for(site, SiteLookup::Seismic).await;
            self.state
                .lock()
                .seismic
                .clone()
                .map(|profile| SeismicProfile { site, ..profile })
        })
    }

    fn nearby_earthquakes(
        &self,
        site: LatLon,
        query: EarthquakeQuery,
    ) -> BoxFuture<'_, Vec<EarthquakeRecord>> {
        Box::pin(async move {
            self.record(format!("earthquakes {site}"));
            self.wait_for(site, SiteLookup::Earthquakes).await;
            let state = self.state.lock();
            state
                .earthquakes
                .iter()
                .take(query.limit as usize)
                .cloned()
                .collect()
        })
    }

    fn neo_feed(&self) -> BoxFuture<'_, Result<NeoFeed, FeedError>> {
        Box::pin(async move {
            self.record("neo feed");
            self.state
                .lock()
                .neo_feed
                .clone()
                .ok_or_else(|| FeedError::new("NEO feed unavailable"))
        })
    }

    fn neo_detail<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<NeoDetail, FeedError>> {
        Box::pin(async move {
            self.record(format!("neo detail {id}"));
            self.state
                .lock()
                .neo_details
                .get(id)
                .cloned()
                .ok_or_else(|| FeedError::new(format!("no NEO with id {id}")))
        })
    }
}
