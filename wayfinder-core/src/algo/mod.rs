pub mod distance;

pub use distance::{CompassDirection, haversine_distance, initial_bearing};
