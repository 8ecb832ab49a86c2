//! Capabilities the engine consumes from external geocoding and routing
//! services, and the HTTP clients implementing them.
//!
//! Resolution and fallback logic are generic over [`GeocodingProvider`] and
//! [`RoutingProvider`], so a provider can be swapped without touching them.

mod nominatim;
mod openroute;
pub(crate) mod raw_types;

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Coordinate, RouteInfo, TransportMode};

pub use nominatim::NominatimClient;
pub use openroute::OpenRouteServiceClient;

/// Zoom level asking for building-level precision
pub const ZOOM_BUILDING: u8 = 18;
/// Zoom level asking for street-level precision
pub const ZOOM_STREET: u8 = 16;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Provider answered with HTTP status {0}")]
    Status(u16),
    #[error("Could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("Provider not configured: {0}")]
    NotConfigured(&'static str),
}

/// One reverse-geocoding request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseQuery {
    pub coordinate: Coordinate,
    pub zoom: u8,
    /// Restrict matches to the address layer
    pub address_layer: bool,
}

impl ReverseQuery {
    /// Maximum precision, address layer only
    pub fn precise(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            zoom: ZOOM_BUILDING,
            address_layer: true,
        }
    }

    /// Street-level precision over all layers
    pub fn coarse(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            zoom: ZOOM_STREET,
            address_layer: false,
        }
    }

    /// Maximum precision over all layers
    pub fn precise_unrestricted(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            zoom: ZOOM_BUILDING,
            address_layer: false,
        }
    }
}

/// Structured address parts a reverse geocoder may return
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressFields {
    pub block: Option<String>,
    pub building: Option<String>,
    pub house_number: Option<String>,
    pub unit: Option<String>,
    pub level: Option<String>,
    pub road: Option<String>,
    pub pedestrian: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl AddressFields {
    /// Road-like field naming the street the point is on
    pub fn street(&self) -> Option<&str> {
        self.road.as_deref().or(self.pedestrian.as_deref())
    }

    pub fn has_street_level(&self) -> bool {
        self.street().is_some_and(|s| !s.trim().is_empty())
    }

    /// Block or unit number, when reported separately from the display name
    pub fn block_number(&self) -> Option<&str> {
        self.block
            .as_deref()
            .or(self.unit.as_deref())
            .filter(|b| !b.trim().is_empty())
    }
}

/// A reverse-geocoding answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReversePlace {
    pub display_name: Option<String>,
    /// The coordinate the provider matched, if it echoed one
    pub matched: Option<Coordinate>,
    pub address: AddressFields,
}

/// Coordinate ↔ text lookups
pub trait GeocodingProvider: Send + Sync {
    /// Reverse-geocodes one coordinate. `Ok(None)` means nothing was found.
    fn reverse(
        &self,
        query: ReverseQuery,
    ) -> impl Future<Output = Result<Option<ReversePlace>, ProviderError>> + Send;

    /// Best match for a free-text query. `Ok(None)` means no match.
    fn search(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, ProviderError>> + Send;
}

/// Point-to-point routing
pub trait RoutingProvider: Send + Sync {
    fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
    ) -> impl Future<Output = Result<RouteInfo, ProviderError>> + Send;
}

impl<T: GeocodingProvider> GeocodingProvider for Arc<T> {
    fn reverse(
        &self,
        query: ReverseQuery,
    ) -> impl Future<Output = Result<Option<ReversePlace>, ProviderError>> + Send {
        (**self).reverse(query)
    }

    fn search(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, ProviderError>> + Send {
        (**self).search(text)
    }
}

impl<T: GeocodingProvider> GeocodingProvider for &T {
    fn reverse(
        &self,
        query: ReverseQuery,
    ) -> impl Future<Output = Result<Option<ReversePlace>, ProviderError>> + Send {
        (**self).reverse(query)
    }

    fn search(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, ProviderError>> + Send {
        (**self).search(text)
    }
}

impl<T: RoutingProvider> RoutingProvider for Arc<T> {
    fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
    ) -> impl Future<Output = Result<RouteInfo, ProviderError>> + Send {
        (**self).directions(start, end, mode)
    }
}

impl<T: RoutingProvider> RoutingProvider for &T {
    fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
    ) -> impl Future<Output = Result<RouteInfo, ProviderError>> + Send {
        (**self).directions(start, end, mode)
    }
}
