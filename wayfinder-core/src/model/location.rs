use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A single fix produced by the coordinate source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationObservation {
    pub coordinate: Coordinate,
    /// Radius of the 68% confidence circle reported by the sensor
    pub accuracy_meters: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

impl LocationObservation {
    pub fn new(coordinate: Coordinate, accuracy_meters: Option<f64>) -> Self {
        Self {
            coordinate,
            accuracy_meters,
            observed_at: Utc::now(),
        }
    }
}

/// Human-readable address for a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressResolution {
    pub formatted_address: String,
    /// The coordinate that was asked about
    pub source_coordinate: Coordinate,
    /// The coordinate the provider says it matched, when it echoed one
    pub matched_coordinate: Option<Coordinate>,
    /// Great-circle distance between the requested and matched coordinates.
    /// `None` when the provider did not echo a coordinate.
    pub confidence_meters: Option<f64>,
}

impl AddressResolution {
    /// Resolution that only carries the coordinate itself as text
    pub fn coordinate_only(coordinate: Coordinate) -> Self {
        Self {
            formatted_address: coordinate.to_string(),
            source_coordinate: coordinate,
            matched_coordinate: None,
            confidence_meters: Some(0.0),
        }
    }

    /// True when the match is far off or could not be measured
    pub fn is_suspect(&self) -> bool {
        self.confidence_meters
            .is_none_or(|d| d > crate::SUSPECT_ROUND_TRIP_METERS)
    }
}
