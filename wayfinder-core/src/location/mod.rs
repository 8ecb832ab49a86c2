//! Device location acquisition

mod source;

pub use source::{CoordinateSource, LocationSensor, PositionOptions, ReportedFix, SensorError};
