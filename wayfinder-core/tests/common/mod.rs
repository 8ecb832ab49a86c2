#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use wayfinder_core::EARTH_RADIUS_METERS;
use wayfinder_core::providers::{
    AddressFields, GeocodingProvider, ProviderError, ReversePlace, ReverseQuery, RoutingProvider,
};
use wayfinder_core::{Coordinate, RouteInfo, RouteSource, RouteStep, TransportMode};

pub fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

/// Point `meters` due north of `origin`
pub fn north_of(origin: Coordinate, meters: f64) -> Coordinate {
    coord(origin.lat + (meters / EARTH_RADIUS_METERS).to_degrees(), origin.lon)
}

/// Point `meters` due east of a point on the equator
pub fn east_on_equator(meters: f64) -> Coordinate {
    coord(0.0, (meters / EARTH_RADIUS_METERS).to_degrees())
}

pub fn place(display: &str, matched: Coordinate, address: AddressFields) -> ReversePlace {
    ReversePlace {
        display_name: Some(display.to_string()),
        matched: Some(matched),
        address,
    }
}

pub fn road(name: &str) -> AddressFields {
    AddressFields {
        road: Some(name.to_string()),
        city: Some("Singapore".to_string()),
        country: Some("Singapore".to_string()),
        country_code: Some("sg".to_string()),
        ..AddressFields::default()
    }
}

/// Geocoder answering from fixed tables and recording every request
#[derive(Default)]
pub struct FakeGeocoder {
    /// Reverse answers keyed by `(zoom, address_layer)`
    pub reverse_answers: HashMap<(u8, bool), ReversePlace>,
    pub reverse_fails: bool,
    pub search_answers: HashMap<String, Coordinate>,
    pub search_fails: bool,
    pub reverse_calls: Mutex<Vec<ReverseQuery>>,
    pub search_calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn with_reverse(mut self, zoom: u8, address_layer: bool, answer: ReversePlace) -> Self {
        self.reverse_answers.insert((zoom, address_layer), answer);
        self
    }

    pub fn with_destination(mut self, text: &str, at: Coordinate) -> Self {
        self.search_answers.insert(text.to_string(), at);
        self
    }

    pub fn reverse_queries(&self) -> Vec<(u8, bool)> {
        self.reverse_calls
            .lock()
            .unwrap()
            .iter()
            .map(|q| (q.zoom, q.address_layer))
            .collect()
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }
}

impl GeocodingProvider for FakeGeocoder {
    async fn reverse(&self, query: ReverseQuery) -> Result<Option<ReversePlace>, ProviderError> {
        self.reverse_calls.lock().unwrap().push(query);
        if self.reverse_fails {
            return Err(ProviderError::Status(503));
        }
        Ok(self
            .reverse_answers
            .get(&(query.zoom, query.address_layer))
            .cloned())
    }

    async fn search(&self, text: &str) -> Result<Option<Coordinate>, ProviderError> {
        self.search_calls.lock().unwrap().push(text.to_string());
        if self.search_fails {
            return Err(ProviderError::Status(502));
        }
        Ok(self.search_answers.get(text).copied())
    }
}

/// Router that either fails with a status or returns a canned two-step
/// route, optionally after a per-destination delay
pub struct FakeRouter {
    pub fail_with: Option<u16>,
    pub delays: Vec<(Coordinate, Duration)>,
    pub calls: AtomicUsize,
}

impl FakeRouter {
    pub fn healthy() -> Self {
        Self {
            fail_with: None,
            delays: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::healthy()
        }
    }

    pub fn with_delay(mut self, to: Coordinate, delay: Duration) -> Self {
        self.delays.push((to, delay));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoutingProvider for FakeRouter {
    async fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TransportMode,
    ) -> Result<RouteInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((_, delay)) = self.delays.iter().find(|(to, _)| *to == end) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(status) = self.fail_with {
            return Err(ProviderError::Status(status));
        }
        let steps = vec![
            RouteStep {
                distance_meters: 700.0,
                duration_seconds: 60.0,
                instruction: "Head north".to_string(),
                maneuver_type: 11,
            },
            RouteStep {
                distance_meters: 0.0,
                duration_seconds: 0.0,
                instruction: "Arrive at your destination".to_string(),
                maneuver_type: 10,
            },
        ];
        Ok(RouteInfo::new(
            712.0,
            61.0,
            steps,
            vec![start, end],
            mode,
            RouteSource::Provider,
        )
        .unwrap())
    }
}
