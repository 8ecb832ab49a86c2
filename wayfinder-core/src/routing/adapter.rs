use log::{info, warn};

use super::fallback::compute_fallback_to;
use crate::providers::RoutingProvider;
use crate::{Coordinate, RouteInfo, TransportMode};

/// Routes through the provider, degrading to a straight line on any failure
///
/// From the caller's point of view this never fails; only the quality of the
/// returned route varies (see [`RouteInfo::source`]).
#[derive(Debug, Clone)]
pub struct RouteProviderAdapter<R> {
    router: R,
}

impl<R: RoutingProvider> RouteProviderAdapter<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    pub async fn compute_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
    ) -> RouteInfo {
        self.compute_route_to(start, end, mode, None).await
    }

    /// Like [`compute_route`](Self::compute_route), naming the destination in
    /// the fallback instruction if one is needed.
    pub async fn compute_route_to(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
        destination: Option<&str>,
    ) -> RouteInfo {
        match self.router.directions(start, end, mode).await {
            Ok(route) => {
                info!(
                    "Routed {start} -> {end} by {mode}: {:.0} m, {:.0} s, {} steps",
                    route.total_distance_meters,
                    route.total_duration_seconds,
                    route.steps.len()
                );
                route
            }
            Err(e) => {
                warn!("Routing provider failed ({e}), using straight-line fallback");
                compute_fallback_to(start, end, mode, destination)
            }
        }
    }
}
