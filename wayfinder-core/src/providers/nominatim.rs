use log::{debug, trace};

use super::raw_types::{RawReverseResponse, RawSearchResult, top_search_hit};
use super::{GeocodingProvider, ProviderError, ReversePlace, ReverseQuery};
use crate::{Coordinate, EngineConfig};

/// Nominatim-compatible geocoding over HTTPS
///
/// Every request carries the configured `User-Agent`, which public
/// Nominatim instances require to identify the client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: &EngineConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, path: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
        let url = format!("{}/{path}", self.base_url);
        trace!("GET {url} {params:?}");
        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Geocoder answered {status} for {path}");
            return Err(ProviderError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl GeocodingProvider for NominatimClient {
    async fn reverse(&self, query: ReverseQuery) -> Result<Option<ReversePlace>, ProviderError> {
        let mut params = vec![
            ("format", "json".to_string()),
            ("lat", query.coordinate.lat.to_string()),
            ("lon", query.coordinate.lon.to_string()),
            ("zoom", query.zoom.to_string()),
            ("addressdetails", "1".to_string()),
        ];
        if query.address_layer {
            params.push(("layer", "address".to_string()));
        }

        let body = self.get_text("reverse", &params).await?;
        let raw: RawReverseResponse = serde_json::from_str(&body)?;
        Ok(raw.into_place())
    }

    async fn search(&self, text: &str) -> Result<Option<Coordinate>, ProviderError> {
        let params = [
            ("format", "json".to_string()),
            ("q", text.to_string()),
            ("limit", "1".to_string()),
        ];

        let body = self.get_text("search", &params).await?;
        let results: Vec<RawSearchResult> = serde_json::from_str(&body)?;
        top_search_hit(results)
    }
}
