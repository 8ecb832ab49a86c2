use thiserror::Error;

use crate::location::SensorError;
use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Location services are unavailable on this device")]
    LocationUnavailable,
    #[error("Timed out waiting for a location fix")]
    LocationTimeout,
    #[error("Location permission denied")]
    LocationDenied,
    #[error("Reverse geocoding failed: {0}")]
    ResolutionFailed(String),
    #[error("Geocoding service unavailable: {0}")]
    GeocodingUnavailable(#[source] ProviderError),
    #[error("Destination not found: {0}")]
    DestinationNotFound(String),
    #[error("Navigate request {0} was superseded by a newer one")]
    Superseded(u64),
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<SensorError> for Error {
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::Unsupported | SensorError::PositionUnavailable => {
                Error::LocationUnavailable
            }
            SensorError::PermissionDenied => Error::LocationDenied,
            SensorError::Timeout => Error::LocationTimeout,
            SensorError::InvalidFix { lat, lon } => Error::InvalidCoordinate { lat, lon },
        }
    }
}
