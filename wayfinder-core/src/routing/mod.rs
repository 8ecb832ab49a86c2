//! Route computation: provider routing with a straight-line fallback, and
//! `GeoJSON` export for the map renderer.

mod adapter;
mod fallback;
mod to_geojson;

pub use adapter::RouteProviderAdapter;
pub use fallback::{compute_fallback, compute_fallback_to};
