//! WGS-84 coordinate type shared by every component

use std::fmt;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A point on the WGS-84 ellipsoid, in degrees
///
/// Latitude comes first everywhere in the engine. Providers that speak
/// longitude-first (GeoJSON) are converted at their boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] when `lat` is outside `[-90, 90]`
    /// or `lon` is outside `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Result<Self, Error> {
        if !lat.is_finite() || !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidCoordinate { lat, lon });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Builds a coordinate from a GeoJSON-style `[lon, lat]` position.
    ///
    /// # Errors
    ///
    /// Returns an error if the position has fewer than two components or is
    /// out of range.
    pub fn from_lon_lat(position: &[f64]) -> Result<Self, Error> {
        match position {
            [lon, lat, ..] => Self::new(*lat, *lon),
            _ => Err(Error::InvalidData(format!(
                "position needs at least 2 components, got {}",
                position.len()
            ))),
        }
    }

    /// `lon,lat` pair as routing providers expect it in query strings
    pub fn to_lon_lat_param(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.lon, y: c.lat }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(c: Coordinate) -> Self {
        Point::new(c.lon, c.lat)
    }
}
