use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use crate::{Coordinate, Error, LocationObservation};

/// Failures reported by the underlying location sensor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("device has no location capability")]
    Unsupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("sensor timed out")]
    Timeout,
    #[error("sensor reported an invalid fix ({lat}, {lon})")]
    InvalidFix { lat: f64, lon: f64 },
}

impl SensorError {
    /// Maps a W3C Geolocation `PositionError.code`
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => SensorError::PermissionDenied,
            3 => SensorError::Timeout,
            _ => SensorError::PositionUnavailable,
        }
    }
}

/// Options passed to the sensor for one fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the sensor may return; zero forces a fresh one
    pub maximum_age: Duration,
}

impl PositionOptions {
    pub fn fresh_high_accuracy(timeout: Duration) -> Self {
        Self {
            enable_high_accuracy: true,
            timeout,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Capability of a device to produce location fixes
pub trait LocationSensor: Send + Sync {
    /// Whether the platform exposes a location sensor at all
    fn is_available(&self) -> bool;

    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<LocationObservation, SensorError>> + Send;
}

/// Single-shot, fresh, high-accuracy location acquisition
///
/// There is no retry: each `acquire` performs exactly one sensor request and
/// the caller decides whether to ask again.
#[derive(Debug, Clone)]
pub struct CoordinateSource<S> {
    sensor: S,
    timeout: Duration,
}

impl<S: LocationSensor> CoordinateSource<S> {
    pub fn new(sensor: S, timeout: Duration) -> Self {
        Self { sensor, timeout }
    }

    /// Acquires one fresh fix from the sensor.
    ///
    /// # Errors
    ///
    /// * [`Error::LocationUnavailable`] when the device has no sensor or no
    ///   position could be determined
    /// * [`Error::LocationDenied`] when permission was refused
    /// * [`Error::LocationTimeout`] when no fix arrived within the timeout
    pub async fn acquire(&self) -> Result<LocationObservation, Error> {
        if !self.sensor.is_available() {
            warn!("Location requested on a device without location capability");
            return Err(Error::LocationUnavailable);
        }

        let options = PositionOptions::fresh_high_accuracy(self.timeout);
        let observation = tokio::time::timeout(self.timeout, self.sensor.current_position(options))
            .await
            .map_err(|_| {
                warn!("No location fix within {:?}", self.timeout);
                Error::LocationTimeout
            })??;

        debug!(
            "Acquired fix {} (accuracy {:?} m)",
            observation.coordinate, observation.accuracy_meters
        );
        Ok(observation)
    }
}

/// A fix (or sensor failure) reported by a remote device
///
/// The browser performs the actual geolocation request and posts the
/// outcome; this sensor replays it once.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportedFix {
    Position {
        lat: f64,
        lon: f64,
        accuracy_meters: Option<f64>,
    },
    Failed(SensorError),
}

impl LocationSensor for ReportedFix {
    fn is_available(&self) -> bool {
        !matches!(self, ReportedFix::Failed(SensorError::Unsupported))
    }

    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<LocationObservation, SensorError> {
        match self {
            ReportedFix::Position {
                lat,
                lon,
                accuracy_meters,
            } => {
                let coordinate = Coordinate::new(*lat, *lon)
                    .map_err(|_| SensorError::InvalidFix { lat: *lat, lon: *lon })?;
                let accuracy = accuracy_meters.filter(|a| a.is_finite() && *a >= 0.0);
                Ok(LocationObservation::new(coordinate, accuracy))
            }
            ReportedFix::Failed(err) => Err(err.clone()),
        }
    }
}
