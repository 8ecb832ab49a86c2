use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::Error;

/// Routing profile used for cars
pub const DRIVING_PROFILE: &str = "driving-car";
/// Routing profile shared by buses and trains
pub const PUBLIC_TRANSPORT_PROFILE: &str = "public-transport";

/// Maneuver code for arriving, as numbered by the routing provider
pub const MANEUVER_ARRIVE: i32 = 10;
/// Maneuver code for the departure step
pub const MANEUVER_DEPART: i32 = 11;

/// How the traveller is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Car,
    Bus,
    Train,
}

impl TransportMode {
    /// Upstream routing profile for this mode.
    ///
    /// Bus and train map to the same public-transport profile, so provider
    /// routes for the two are identical; only the fallback tells them apart.
    pub fn routing_profile(self) -> &'static str {
        match self {
            TransportMode::Car => DRIVING_PROFILE,
            TransportMode::Bus | TransportMode::Train => PUBLIC_TRANSPORT_PROFILE,
        }
    }

    /// Flat average speed used for fallback duration estimates, in km/h
    pub fn average_speed_kmh(self) -> f64 {
        match self {
            TransportMode::Car => 50.0,
            TransportMode::Bus => 30.0,
            TransportMode::Train => 80.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(TransportMode::Car),
            "bus" => Ok(TransportMode::Bus),
            "train" => Ok(TransportMode::Train),
            other => Err(Error::InvalidData(format!("unknown transport mode '{other}'"))),
        }
    }
}

/// One instruction unit of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub instruction: String,
    pub maneuver_type: i32,
}

/// Where a route came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Road or transit following route from the routing provider
    Provider,
    /// Straight-line estimate computed locally
    Fallback,
}

/// A complete computed route
///
/// Totals are taken from the provider when it reports them and need not
/// equal the sum over `steps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRouteInfo")]
pub struct RouteInfo {
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
    pub steps: Vec<RouteStep>,
    pub geometry: Vec<Coordinate>,
    pub mode: TransportMode,
    pub source: RouteSource,
}

#[derive(Deserialize)]
struct RawRouteInfo {
    total_distance_meters: f64,
    total_duration_seconds: f64,
    steps: Vec<RouteStep>,
    geometry: Vec<Coordinate>,
    mode: TransportMode,
    source: RouteSource,
}

impl TryFrom<RawRouteInfo> for RouteInfo {
    type Error = Error;

    fn try_from(raw: RawRouteInfo) -> Result<Self, Self::Error> {
        Self::new(
            raw.total_distance_meters,
            raw.total_duration_seconds,
            raw.steps,
            raw.geometry,
            raw.mode,
            raw.source,
        )
    }
}

impl RouteInfo {
    /// Creates a route, checking that the geometry is a drawable line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if `geometry` has fewer than 2 points
    /// or a total is negative or non-finite.
    pub fn new(
        total_distance_meters: f64,
        total_duration_seconds: f64,
        steps: Vec<RouteStep>,
        geometry: Vec<Coordinate>,
        mode: TransportMode,
        source: RouteSource,
    ) -> Result<Self, Error> {
        if geometry.len() < 2 {
            return Err(Error::InvalidData(format!(
                "route geometry needs at least 2 points, got {}",
                geometry.len()
            )));
        }
        for total in [total_distance_meters, total_duration_seconds] {
            if !total.is_finite() || total < 0.0 {
                return Err(Error::InvalidData(format!("invalid route total {total}")));
            }
        }
        Ok(Self {
            total_distance_meters,
            total_duration_seconds,
            steps,
            geometry,
            mode,
            source,
        })
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RouteSource::Fallback
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.geometry.first().copied()
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.geometry.last().copied()
    }
}
