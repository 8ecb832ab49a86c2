pub use crate::{
    COARSE_ACCURACY_METERS, EARTH_RADIUS_METERS, SUSPECT_ROUND_TRIP_METERS,
    TRUSTED_ROUND_TRIP_METERS,
};

// Re-export key components
pub use crate::algo::{CompassDirection, haversine_distance, initial_bearing};
pub use crate::config::EngineConfig;
pub use crate::error::Error;
pub use crate::location::{CoordinateSource, LocationSensor, ReportedFix, SensorError};
pub use crate::navigator::{LocatedDevice, Navigator};
pub use crate::resolve::{AddressResolver, DestinationResolver};
pub use crate::routing::{RouteProviderAdapter, compute_fallback, compute_fallback_to};
pub use crate::session::{NavigationSession, Progress, RequestToken, SessionState, SessionView};

// Provider capabilities and their HTTP implementations
pub use crate::providers::{
    GeocodingProvider, NominatimClient, OpenRouteServiceClient, ProviderError, RoutingProvider,
};

// Core data model
pub use crate::model::{
    AddressResolution, Coordinate, LocationObservation, RouteInfo, RouteSource, RouteStep,
    TransportMode,
};
