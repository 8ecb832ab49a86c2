//! Coordinate ↔ text resolution built on a [`GeocodingProvider`]
//!
//! [`GeocodingProvider`]: crate::providers::GeocodingProvider

pub mod address;
mod destination;

pub use address::{AddressResolver, assemble_address, format_place};
pub use destination::DestinationResolver;
