//! `reqwest`-backed implementation of [`SiteDataSource`].

use foundation::math::LatLon;
use serde_json::Value;
use tracing::{debug, warn};

use crate::earthquakes::{EarthquakeQuery, EarthquakeRecord, parse_earthquakes};
use crate::population::parse_population_density;
use crate::seismic::{SeismicProfile, parse_seismic_profile};
use crate::{BoxFuture, FeedEndpoints, FeedError, NeoDetail, NeoFeed, SiteDataSource};

/// Live feeds over HTTP.
pub struct HttpFeeds {
    endpoints: FeedEndpoints,
    client: reqwest::Client,
}

impl HttpFeeds {
    pub fn new(endpoints: FeedEndpoints) -> Self {
        Self::with_client(endpoints, reqwest::Client::new())
    }

    pub fn with_client(endpoints: FeedEndpoints, client: reqwest::Client) -> Self {
        Self { endpoints, client }
    }

    pub fn endpoints(&self) -> &FeedEndpoints {
        &self.endpoints
    }

    async fn get_json(
        &self,
        feed: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, FeedError> {
        // URLs may carry the catalog key, so errors are reported without them.
        let resp = request
            .send()
            .await
            .map_err(|e| FeedError::with_source(format!("{feed} request failed"), e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::new(format!("{feed} returned HTTP {status}")));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| FeedError::with_source(format!("{feed} returned invalid JSON"), e.without_url()))
    }

    fn catalog_request(&self, path: &str) -> reqwest::RequestBuilder {
        let base = self.endpoints.nasa_neows.trim_end_matches('/');
        self.client
            .get(format!("{base}/{path}"))
            .query(&[("api_key", self.endpoints.nasa_api_key.as_str())])
    }
}

impl SiteDataSource for HttpFeeds {
    fn population_density(&self, site: LatLon) -> BoxFuture<'_, Option<f64>> {
        Box::pin(async move {
            let geometry = format!("{},{}", site.lon, site.lat);
            let request = self.client.get(&self.endpoints.worldpop_identify).query(&[
                ("geometry", geometry.as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("returnGeometry", "false"),
                ("f", "pjson"),
            ]);
            match self.get_json("population density", request).await {
                Ok(body) => {
                    let density = parse_population_density(&body);
                    debug!("population density at {site}: {density:?}");
                    density
                }
                Err(e) => {
                    warn!("population lookup at {site} failed: {e}");
                    None
                }
            }
        })
    }

    fn seismic_design_values(&self, site: LatLon) -> BoxFuture<'_, Option<SeismicProfile>> {
        Box::pin(async move {
            let lat = site.lat.to_string();
            let lon = site.lon.to_string();
            let request = self.client.get(&self.endpoints.usgs_designmaps).query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("riskCategory", "II"),
                ("siteClass", "C"),
                ("title", "ImpactSite"),
            ]);
            match self.get_json("seismic design values", request).await {
                Ok(body) => {
                    let profile = parse_seismic_profile(&body, site);
                    if profile.is_none() {
                        debug!("no seismic design data at {site}");
                    }
                    profile
                }
                Err(e) => {
                    warn!("seismic lookup at {site} failed: {e}");
                    None
                }
            }
        })
    }

    fn nearby_earthquakes(
        &self,
        site: LatLon,
        query: EarthquakeQuery,
    ) -> BoxFuture<'_, Vec<EarthquakeRecord>> {
        Box::pin(async move {
            let lat = site.lat.to_string();
            let lon = site.lon.to_string();
            let radius = query.radius_km.to_string();
            let limit = query.limit.to_string();
            let request = self.client.get(&self.endpoints.usgs_fdsn).query(&[
                ("format", "geojson"),
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("maxradiuskm", radius.as_str()),
                ("limit", limit.as_str()),
                ("orderby", "time"),
            ]);
            match self.get_json("earthquake catalog", request).await {
                Ok(body) => parse_earthquakes(&body),
                Err(e) => {
                    warn!("earthquake lookup at {site} failed: {e}");
                    Vec::new()
                }
            }
        })
    }

    fn neo_feed(&self) -> BoxFuture<'_, Result<NeoFeed, FeedError>> {
        Box::pin(async move {
            let body = self.get_json("NEO feed", self.catalog_request("feed")).await?;
            serde_json::from_value(body)
                .map_err(|e| FeedError::with_source("NEO feed has an unexpected shape", e))
        })
    }

    fn neo_detail<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<NeoDetail, FeedError>> {
        Box::pin(async move {
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(FeedError::new(format!("invalid NEO id {id:?}")));
            }
            let body = self
                .get_json("NEO detail", self.catalog_request(&format!("neo/{id}")))
                .await?;
            serde_json::from_value(body)
                .map_err(|e| FeedError::with_source("NEO detail has an unexpected shape", e))
        })
    }
}
