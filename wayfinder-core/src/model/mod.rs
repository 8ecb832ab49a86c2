//! Data model for location resolution and routing
//!
//! Contains the coordinate, observation, address and route types exchanged
//! between the engine components.

pub mod coordinate;
pub mod location;
pub mod route;

pub use coordinate::Coordinate;
pub use location::{AddressResolution, LocationObservation};
pub use route::{RouteInfo, RouteSource, RouteStep, TransportMode};
