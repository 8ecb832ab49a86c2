use log::{debug, trace};

use super::raw_types::RawDirectionsResponse;
use super::{ProviderError, RoutingProvider};
use crate::{Coordinate, EngineConfig, RouteInfo, TransportMode};

/// OpenRouteService-compatible directions over HTTPS
#[derive(Debug, Clone)]
pub struct OpenRouteServiceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenRouteServiceClient {
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
            base_url: config.routing_base_url.trim_end_matches('/').to_string(),
            api_key: config.routing_api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

impl RoutingProvider for OpenRouteServiceClient {
    async fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
    ) -> Result<RouteInfo, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("routing API key"))?;

        let url = format!("{}/directions/{}", self.base_url, mode.routing_profile());
        trace!("GET {url} start={start} end={end}");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", api_key.to_string()),
                ("start", start.to_lon_lat_param()),
                ("end", end.to_lon_lat_param()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Routing provider answered {status} for profile {}", mode.routing_profile());
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let raw: RawDirectionsResponse = serde_json::from_str(&body)?;
        raw.into_route(mode)
    }
}
