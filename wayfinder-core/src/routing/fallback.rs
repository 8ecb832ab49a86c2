use crate::algo::{CompassDirection, haversine_distance, initial_bearing};
use crate::model::route::{MANEUVER_ARRIVE, MANEUVER_DEPART};
use crate::{Coordinate, RouteInfo, RouteSource, RouteStep, TransportMode};

/// Straight-line route used when the routing provider cannot answer.
///
/// Pure and total: distance is the Haversine great-circle distance, duration
/// assumes the flat average speed of `mode`, and the route has a single step
/// and a two-point geometry.
pub fn compute_fallback(start: Coordinate, end: Coordinate, mode: TransportMode) -> RouteInfo {
    compute_fallback_to(start, end, mode, None)
}

/// [`compute_fallback`] with a human name for the destination in the
/// instruction. Without one the destination coordinate is named.
pub fn compute_fallback_to(
    start: Coordinate,
    end: Coordinate,
    mode: TransportMode,
    destination: Option<&str>,
) -> RouteInfo {
    let distance = haversine_distance(start, end);
    let duration = distance / 1000.0 / mode.average_speed_kmh() * 3600.0;

    let destination = destination
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| end.to_string(), str::to_string);

    let (instruction, maneuver_type) = if distance > 0.0 {
        let heading = CompassDirection::from_bearing(initial_bearing(start, end));
        (
            format!(
                "Head {heading} towards {destination} by {mode} ({})",
                format_distance(distance)
            ),
            MANEUVER_DEPART,
        )
    } else {
        (format!("You are at {destination}"), MANEUVER_ARRIVE)
    };

    RouteInfo {
        total_distance_meters: distance,
        total_duration_seconds: duration,
        steps: vec![RouteStep {
            distance_meters: distance,
            duration_seconds: duration,
            instruction,
            maneuver_type,
        }],
        geometry: vec![start, end],
        mode,
        source: RouteSource::Fallback,
    }
}

fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
