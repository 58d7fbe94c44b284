use std::{thread, time::Duration};

use anyhow::{Context, Result, bail};
use geo::Rect;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::{
    config::SourceConfig,
    io::geojson::read_geojson_bytes,
    types::{FeatureCollection, GROSS_ACRES_FIELD, PIN_FIELD, Pin},
};
use super::{FeatureSource, Layer};

/// Delay before the first retry; doubled for every further attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Feature source backed by ArcGIS REST feature-service query endpoints.
#[derive(Debug, Clone)]
pub struct ArcGisSource {
    client: Client,
    config: SourceConfig,
}

impl ArcGisSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("farmcards/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("[source::arcgis] Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Spatial reference parameter, e.g. `{"wkid": 3435}`.
    fn spatial_reference(&self) -> String {
        format!("{{\"wkid\": {}}}", self.config.wkid)
    }

    /// Run a query, following `exceededTransferLimit` pages.
    fn query(&self, url: &str, params: &[(&str, String)]) -> Result<FeatureCollection> {
        let mut collection = FeatureCollection::new(Vec::new(), Some(self.config.wkid));
        for page_no in 0..self.config.max_pages.max(1) {
            let mut page_params = params.to_vec();
            if page_no > 0 {
                page_params.push(("resultOffset", collection.len().to_string()));
            }

            let body = self.get_with_retry(url, &page_params)?;
            let page = read_geojson_bytes(&body).with_context(|| format!("[source::arcgis] Bad response from {url}"))?;
            let fetched = page.collection.len();
            collection.extend(page.collection);

            if !page.exceeded_transfer_limit || fetched == 0 {
                return Ok(collection);
            }
            debug!(url, fetched, total = collection.len(), "result truncated, fetching next page");
        }
        bail!("[source::arcgis] Query to {url} exceeded {} pages", self.config.max_pages)
    }

    /// GET with bounded retry and exponential backoff on transport or HTTP errors.
    fn get_with_retry(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            let result = self.client.get(url)
                .query(params)
                .send()
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.bytes());

            match result {
                Ok(bytes) => return Ok(bytes.to_vec()),
                Err(err) if attempt < self.config.retries => {
                    let delay = RETRY_BACKOFF * 2u32.saturating_pow(attempt);
                    warn!(url, attempt = attempt + 1, ?delay, error = %err, "request failed, retrying");
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err).with_context(|| format!("[source::arcgis] GET {url} failed after {} attempts", attempt + 1)),
            }
        }
    }
}

impl FeatureSource for ArcGisSource {
    fn parcels(&self, pin: &Pin) -> Result<FeatureCollection> {
        let params = [
            ("where", pin_predicate(pin)),
            ("outFields", format!("{GROSS_ACRES_FIELD},{PIN_FIELD}")),
            ("returnGeometry", "true".to_string()),
            ("outSR", self.spatial_reference()),
            ("f", "geojson".to_string()),
        ];
        self.query(&self.config.parcels_url, &params)
    }

    fn features_in(&self, layer: Layer, envelope: &Rect<f64>) -> Result<FeatureCollection> {
        let url = match layer {
            Layer::Soils => &self.config.soils_url,
            Layer::Landuse => &self.config.landuse_url,
        };
        let params = [
            ("where", "1=1".to_string()),
            ("outFields", "*".to_string()),
            ("returnGeometry", "true".to_string()),
            ("geometryType", "esriGeometryEnvelope".to_string()),
            ("geometry", envelope_param(envelope)),
            ("spatialRel", "esriSpatialRelIntersects".to_string()),
            ("inSR", self.spatial_reference()),
            ("outSR", self.spatial_reference()),
            ("f", "geojson".to_string()),
        ];
        self.query(url, &params)
    }
}

/// `pin IN ('...')` with embedded quotes escaped.
fn pin_predicate(pin: &Pin) -> String {
    format!("{PIN_FIELD} IN ('{}')", pin.raw().replace('\'', "''"))
}

/// `xmin,ymin,xmax,ymax`.
fn envelope_param(envelope: &Rect<f64>) -> String {
    let (min, max) = (envelope.min(), envelope.max());
    format!("{},{},{},{}", min.x, min.y, max.x, max.y)
}
