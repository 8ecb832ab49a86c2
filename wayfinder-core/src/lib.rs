//! Location resolution and route computation for the navigation screen.
//!
//! The engine turns a device fix and a free-text destination into a
//! turn-by-turn [`RouteInfo`]. Geocoding and routing are reached through the
//! [`GeocodingProvider`] and [`RoutingProvider`] capabilities; when routing is
//! unavailable a straight-line fallback route is computed locally, so
//! navigation always yields some route.

pub mod algo;
pub mod config;
mod error;
pub mod location;
pub mod model;
pub mod navigator;
pub mod prelude;
pub mod providers;
pub mod resolve;
pub mod routing;
pub mod session;

pub use config::EngineConfig;
pub use error::Error;
pub use model::{
    AddressResolution, Coordinate, LocationObservation, RouteInfo, RouteSource, RouteStep,
    TransportMode,
};
pub use providers::{GeocodingProvider, ProviderError, RoutingProvider};

/// Mean Earth radius used by every great-circle computation, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Round-trip distance above which a reverse-geocoding answer is suspect
pub const SUSPECT_ROUND_TRIP_METERS: f64 = 20.0;

/// Round-trip distance below which the provider's display string is trusted
pub const TRUSTED_ROUND_TRIP_METERS: f64 = 10.0;

/// Sensor accuracy above which a coarser reverse-geocoding query is attempted
pub const COARSE_ACCURACY_METERS: f64 = 50.0;
