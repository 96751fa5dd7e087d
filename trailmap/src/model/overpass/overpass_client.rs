use super::{OverpassElement, OverpassQuery, OverpassResponse};
use crate::config::OverpassConfig;
use crate::model::TrailmapError;
use reqwest::blocking::Client;
use std::time::Duration;

/// anything that can answer an overpass query with a list of elements
pub trait ElementSource {
    fn query(&self, query: &OverpassQuery) -> Result<Vec<OverpassElement>, TrailmapError>;
}

/// blocking overpass API client that falls back through a list of mirrors
pub struct OverpassClient {
    endpoints: Vec<String>,
    http: Client,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Result<OverpassClient, TrailmapError> {
        let endpoints = config.endpoints();
        if endpoints.is_empty() {
            return Err(TrailmapError::ConfigurationError(String::from(
                "no overpass endpoints configured",
            )));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.client_timeout_secs()))
            .user_agent(concat!("trailmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(OverpassClient { endpoints, http })
    }

    fn post(&self, endpoint: &str, query: &str) -> Result<Vec<OverpassElement>, TrailmapError> {
        let response = self
            .http
            .post(endpoint)
            .form(&[("data", query)])
            .send()?
            .error_for_status()?;
        let body = response.text()?;
        let decoded: OverpassResponse = serde_json::from_str(&body)?;
        Ok(decoded.elements)
    }
}

impl ElementSource for OverpassClient {
    fn query(&self, query: &OverpassQuery) -> Result<Vec<OverpassElement>, TrailmapError> {
        let q = query.to_string();
        log::debug!("overpass query:\n{q}");
        let mut last_error = String::from("no endpoints configured");
        for endpoint in self.endpoints.iter() {
            match self.post(endpoint, &q) {
                Ok(elements) => {
                    log::info!("received {} elements via {endpoint}", elements.len());
                    return Ok(elements);
                }
                Err(e) => {
                    log::warn!("{endpoint} failed ({e}), trying next mirror");
                    last_error = e.to_string();
                }
            }
        }
        Err(TrailmapError::OverpassUnavailable(last_error))
    }
}
