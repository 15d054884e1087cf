//! Near-Earth-object catalog browser with orbit preview.

use std::sync::Arc;

use feeds::{FeedError, NeoEntry, NeoFeed, SiteDataSource};
use orbit::{OrbitHandles, OrbitParameters, OrbitSummary, OrbitVisualizer, SceneError};
use tracing::{info, warn};

use crate::params::{DIAMETER_RANGE_KM, VELOCITY_RANGE_KM_S};

/// Entries kept after sorting the feed.
pub const MAX_LISTED: usize = 20;

/// Velocity seeded when the catalog has none.
pub const DEFAULT_SEED_VELOCITY_KM_S: f64 = 20.0;

pub const DETAIL_FALLBACK_NOTICE: &str =
    "Unable to fetch detailed orbital data. Proceeding with basic data.";
pub const EMPTY_FEED_NOTICE: &str = "No near-earth objects found in the current feed.";

#[derive(Debug)]
pub enum BrowseError {
    Feed(FeedError),
    UnknownEntry(String),
    NothingSelected,
    Scene(SceneError),
}

impl std::fmt::Display for BrowseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowseError::Feed(e) => write!(f, "NEO feed unavailable: {e}"),
            BrowseError::UnknownEntry(id) => write!(f, "no listed NEO with id {id}"),
            BrowseError::NothingSelected => write!(f, "no NEO selected"),
            BrowseError::Scene(e) => write!(f, "orbit preview failed: {e}"),
        }
    }
}

impl std::error::Error for BrowseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowseError::Feed(e) => Some(e),
            BrowseError::Scene(e) => Some(e),
            _ => None,
        }
    }
}

/// Impactor size and speed taken from a catalog object.
#[derive(Debug, Clone, PartialEq)]
pub struct NeoSeed {
    pub name: String,
    pub diameter_km: f64,
    pub velocity_km_s: f64,
}

impl NeoSeed {
    /// Average diameter and approach speed, clamped to the accepted input
    /// ranges. A missing or zero speed becomes 20 km/s.
    pub fn from_entry(entry: &NeoEntry) -> Self {
        let velocity = entry
            .close_approach
            .relative_velocity_km_s
            .filter(|v| v.is_finite() && *v != 0.0)
            .unwrap_or(DEFAULT_SEED_VELOCITY_KM_S);
        Self {
            name: entry.name.clone(),
            diameter_km: entry
                .average_diameter_km()
                .clamp(DIAMETER_RANGE_KM.0, DIAMETER_RANGE_KM.1),
            velocity_km_s: velocity.clamp(VELOCITY_RANGE_KM_S.0, VELOCITY_RANGE_KM_S.1),
        }
    }
}

/// Flattens every date bucket, orders by close approach (undated first,
/// ties keep feed order) and keeps the first [`MAX_LISTED`].
pub fn list_entries(feed: &NeoFeed) -> Vec<NeoEntry> {
    let mut entries: Vec<NeoEntry> = feed
        .flatten()
        .into_iter()
        .map(NeoEntry::from_record)
        .collect();
    entries.sort_by_key(NeoEntry::approach_sort_key);
    entries.truncate(MAX_LISTED);
    entries
}

pub struct NeoBrowser {
    feeds: Arc<dyn SiteDataSource>,
    visualizer: OrbitVisualizer,
    entries: Vec<NeoEntry>,
    selected: Option<NeoEntry>,
    notice: Option<&'static str>,
}

impl NeoBrowser {
    pub fn new(feeds: Arc<dyn SiteDataSource>, visualizer: OrbitVisualizer) -> Self {
        Self {
            feeds,
            visualizer,
            entries: Vec::new(),
            selected: None,
            notice: None,
        }
    }

    pub fn entries(&self) -> &[NeoEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&NeoEntry> {
        self.selected.as_ref()
    }

    /// Message for the user about the last load or selection, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn visualizer(&self) -> &OrbitVisualizer {
        &self.visualizer
    }

    /// Fetches the feed and replaces the listed entries.
    pub async fn load(&mut self) -> Result<&[NeoEntry], BrowseError> {
        let feed = self.feeds.neo_feed().await.map_err(BrowseError::Feed)?;
        self.entries = list_entries(&feed);
        self.notice = self.entries.is_empty().then_some(EMPTY_FEED_NOTICE);
        info!(
            "NEO feed loaded: {} objects, {} listed",
            feed.element_count.unwrap_or(0),
            self.entries.len()
        );
        Ok(&self.entries)
    }

    /// Selects a listed entry, fetches its orbital elements and opens the
    /// orbit preview. Without a detail record the preview uses default
    /// elements and a notice is set.
    ///
    /// Must run inside a tokio runtime.
    pub async fn select(&mut self, id: &str) -> Result<OrbitHandles, BrowseError> {
        let mut entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| BrowseError::UnknownEntry(id.to_string()))?;

        self.notice = None;
        match self.feeds.neo_detail(id).await {
            Ok(detail) => {
                entry.orbit = NeoEntry::from_record(&detail).orbit;
            }
            Err(e) => {
                warn!("NEO detail for {id} unavailable: {e}");
                self.notice = Some(DETAIL_FALLBACK_NOTICE);
            }
        }

        let summary = OrbitSummary::new(&entry, OrbitParameters::from_elements(entry.orbit.as_ref()));
        self.selected = Some(entry);
        self.visualizer.open(summary).map_err(BrowseError::Scene)
    }

    pub fn close_preview(&mut self) {
        self.visualizer.stop();
    }

    /// Stops the preview and turns the selection into simulation inputs.
    pub fn use_selected(&mut self) -> Result<NeoSeed, BrowseError> {
        self.visualizer.stop();
        self.selected
            .as_ref()
            .map(NeoSeed::from_entry)
            .ok_or(BrowseError::NothingSelected)
    }
}
