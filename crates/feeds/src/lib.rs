//! External site-profile and catalog feeds.
//!
//! Every lookup sits behind [`SiteDataSource`]:
//! - population density (WorldPop identify)
//! - seismic design values (USGS design maps)
//! - nearby earthquakes (USGS FDSN event query)
//! - near-Earth-object feed and detail (NASA NeoWs)
//!
//! The site-profile lookups never fail from the caller's point of view; an
//! unreachable or malformed feed degrades to an absent value and a log line.

use std::future::Future;
use std::pin::Pin;

use foundation::math::LatLon;

pub mod config;
pub mod earthquakes;
pub mod error;
pub mod http;
pub mod json;
pub mod memory;
pub mod neo;
pub mod population;
pub mod seismic;

pub use config::FeedEndpoints;
pub use earthquakes::{EarthquakeQuery, EarthquakeRecord, strongest};
pub use error::FeedError;
pub use http::HttpFeeds;
pub use memory::{MemoryFeeds, SiteLookup};
pub use neo::{CloseApproach, NeoEntry, NeoFeed, NeoRecord, OrbitalElements};
pub use seismic::{SeismicProfile, design_category_description};

/// Per-object lookup payload; same shape as a feed record with orbital data.
pub type NeoDetail = NeoRecord;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of external site and catalog data.
///
/// Implementations must be `Send + Sync` for use across spawned tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait SiteDataSource: Send + Sync {
    /// Rounded population density (people/km²) at `site`; `None` when unknown or ≤ 0.
    fn population_density(&self, site: LatLon) -> BoxFuture<'_, Option<f64>>;

    /// Seismic design values at `site`; `None` when the service has no data.
    fn seismic_design_values(&self, site: LatLon) -> BoxFuture<'_, Option<SeismicProfile>>;

    /// Recent earthquakes around `site`, newest first; empty on failure.
    fn nearby_earthquakes(
        &self,
        site: LatLon,
        query: EarthquakeQuery,
    ) -> BoxFuture<'_, Vec<EarthquakeRecord>>;

    /// Upcoming close approaches grouped by date.
    fn neo_feed(&self) -> BoxFuture<'_, Result<NeoFeed, FeedError>>;

    /// Full record for one object, including orbital data.
    fn neo_detail<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<NeoDetail, FeedError>>;
}
