//! The navigate action: destination lookup, then routing, then session update

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::location::{CoordinateSource, LocationSensor};
use crate::providers::{GeocodingProvider, NominatimClient, OpenRouteServiceClient, RoutingProvider};
use crate::resolve::{AddressResolver, DestinationResolver};
use crate::routing::RouteProviderAdapter;
use crate::session::NavigationSession;
use crate::{
    AddressResolution, Coordinate, EngineConfig, Error, LocationObservation, ProviderError,
    RouteInfo, TransportMode,
};

/// The device's position together with its display address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedDevice {
    pub observation: LocationObservation,
    pub address: AddressResolution,
}

/// Engine facade wiring the resolvers and the route adapter together
#[derive(Debug)]
pub struct Navigator<G, R> {
    addresses: AddressResolver<Arc<G>>,
    destinations: DestinationResolver<Arc<G>>,
    routes: RouteProviderAdapter<R>,
    location_timeout: Duration,
}

impl Navigator<NominatimClient, OpenRouteServiceClient> {
    /// Builds a navigator talking to the HTTP providers named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed
    pub fn from_config(config: &EngineConfig) -> Result<Self, ProviderError> {
        if config.routing_api_key.is_none() {
            log::warn!("No routing API key configured; every route will be a straight-line estimate");
        }
        Ok(Self::new(
            NominatimClient::new(config)?,
            OpenRouteServiceClient::new(config)?,
            config.location_timeout(),
        ))
    }
}

impl<G: GeocodingProvider, R: RoutingProvider> Navigator<G, R> {
    pub fn new(geocoder: G, router: R, location_timeout: Duration) -> Self {
        let geocoder = Arc::new(geocoder);
        Self {
            addresses: AddressResolver::new(Arc::clone(&geocoder)),
            destinations: DestinationResolver::new(geocoder),
            routes: RouteProviderAdapter::new(router),
            location_timeout,
        }
    }

    pub fn addresses(&self) -> &AddressResolver<Arc<G>> {
        &self.addresses
    }

    pub fn destinations(&self) -> &DestinationResolver<Arc<G>> {
        &self.destinations
    }

    pub fn routes(&self) -> &RouteProviderAdapter<R> {
        &self.routes
    }

    /// Acquires one fix from `sensor` and resolves its display address.
    ///
    /// # Errors
    ///
    /// Fails only with the location errors of
    /// [`CoordinateSource::acquire`]; address resolution degrades instead.
    pub async fn locate<S: LocationSensor>(&self, sensor: S) -> Result<LocatedDevice, Error> {
        let observation = CoordinateSource::new(sensor, self.location_timeout)
            .acquire()
            .await?;
        let address = self
            .addresses
            .resolve(observation.coordinate, observation.accuracy_meters)
            .await;
        Ok(LocatedDevice {
            observation,
            address,
        })
    }

    /// Resolves `destination` and routes to it from `start`.
    ///
    /// Routing only starts once the destination is known.
    ///
    /// # Errors
    ///
    /// * [`Error::DestinationNotFound`] when the text matches nothing
    /// * [`Error::GeocodingUnavailable`] when the geocoder cannot be reached
    pub async fn plan(
        &self,
        start: Coordinate,
        destination: &str,
        mode: TransportMode,
    ) -> Result<RouteInfo, Error> {
        let end = self
            .destinations
            .resolve_text(destination)
            .await?
            .ok_or_else(|| Error::DestinationNotFound(destination.trim().to_string()))?;

        Ok(self
            .routes
            .compute_route_to(start, end, mode, Some(destination))
            .await)
    }

    /// Plans a route and installs it in `session`, unless a newer navigate
    /// on the same session was issued while this one was in flight.
    ///
    /// The session lock is never held across a provider call.
    ///
    /// # Errors
    ///
    /// The errors of [`plan`](Self::plan), or [`Error::Superseded`] when the
    /// result arrived after a newer request.
    pub async fn navigate(
        &self,
        session: &Mutex<NavigationSession>,
        start: Coordinate,
        destination: &str,
        mode: TransportMode,
    ) -> Result<RouteInfo, Error> {
        let token = lock(session).begin_request();
        info!(
            "Navigate request {} to '{destination}' by {mode}",
            token.value()
        );

        let route = self.plan(start, destination, mode).await?;

        lock(session).apply_route(token, route.clone())?;
        Ok(route)
    }
}

// every session mutation is a single assignment, so a poisoned lock still
// guards a consistent session
fn lock(session: &Mutex<NavigationSession>) -> std::sync::MutexGuard<'_, NavigationSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
