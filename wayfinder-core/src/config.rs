use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration of the external providers and engine timeouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the Nominatim-compatible geocoder
    pub geocoding_base_url: String,
    /// Base URL of the OpenRouteService-compatible router
    pub routing_base_url: String,
    /// Routing API key. Without it every route is computed by the fallback.
    pub routing_api_key: Option<String>,
    /// Client identification sent with every provider request
    pub user_agent: String,
    /// Upper bound for any single provider HTTP call, in seconds
    pub request_timeout_secs: u64,
    /// Upper bound for a location fix, in seconds
    pub location_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: "https://nominatim.openstreetmap.org".to_string(),
            routing_base_url: "https://api.openrouteservice.org/v2".to_string(),
            routing_api_key: None,
            user_agent: concat!("wayfinder/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 10,
            location_timeout_secs: 15,
        }
    }
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs.max(1))
    }
}
