//! Great-circle distance and bearing on a spherical Earth

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Coordinate, EARTH_RADIUS_METERS};

/// Haversine great-circle distance between two coordinates, in meters
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h marginally past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` towards `b`, in degrees within `[0, 360)`
pub fn initial_bearing(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Eight-point compass rose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    const ROSE: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Nearest compass point for a bearing in degrees
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_bearing(bearing: f64) -> Self {
        let normalized = bearing.rem_euclid(360.0);
        let sector = ((normalized + 22.5) / 45.0).floor() as usize % 8;
        Self::ROSE[sector]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompassDirection::North => "north",
            CompassDirection::NorthEast => "northeast",
            CompassDirection::East => "east",
            CompassDirection::SouthEast => "southeast",
            CompassDirection::South => "south",
            CompassDirection::SouthWest => "southwest",
            CompassDirection::West => "west",
            CompassDirection::NorthWest => "northwest",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let p = c(1.3521, 103.8198);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // R * pi / 180
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        let d = haversine_distance(c(0.0, 0.0), c(1.0, 0.0));
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = c(51.5007, -0.1246);
        let b = c(40.6892, -74.0445);
        let ab = haversine_distance(a, b);
        let ba = haversine_distance(b, a);
        assert!((ab - ba).abs() < 1e-6);
        // London to New York is roughly 5,575 km
        assert!((ab - 5_574_800.0).abs() < 10_000.0);
    }

    #[test]
    fn antipodal_points_span_half_the_circumference() {
        let d = haversine_distance(c(0.0, 0.0), c(0.0, 180.0));
        assert!((d - EARTH_RADIUS_METERS * std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn cardinal_bearings() {
        let origin = c(0.0, 0.0);
        assert!((initial_bearing(origin, c(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing(origin, c(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing(origin, c(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(origin, c(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn compass_sectors_wrap_around_north() {
        assert_eq!(CompassDirection::from_bearing(0.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(350.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(22.4), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(22.6), CompassDirection::NorthEast);
        assert_eq!(CompassDirection::from_bearing(135.0), CompassDirection::SouthEast);
        assert_eq!(CompassDirection::from_bearing(-90.0), CompassDirection::West);
        assert_eq!(CompassDirection::from_bearing(315.0).to_string(), "northwest");
    }
}
