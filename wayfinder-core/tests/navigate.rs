mod common;

use std::sync::Mutex;
use std::time::Duration;

use common::{FakeGeocoder, FakeRouter, coord, east_on_equator, place, road};
use wayfinder_core::location::{ReportedFix, SensorError};
use wayfinder_core::providers::ZOOM_BUILDING;
use wayfinder_core::routing::RouteProviderAdapter;
use wayfinder_core::session::{NavigationSession, SessionState};
use wayfinder_core::{Error, RouteInfo, RouteSource, TransportMode};
use wayfinder_core::navigator::Navigator;

const LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

fn within_percent(actual: f64, expected: f64, percent: f64) -> bool {
    (actual - expected).abs() <= expected * percent / 100.0
}

#[tokio::test]
async fn server_error_from_router_yields_car_fallback() {
    let router = FakeRouter::failing(500);
    let adapter = RouteProviderAdapter::new(&router);
    let start = coord(0.0, 0.0);
    let end = east_on_equator(5_000.0);

    let route = adapter.compute_route(start, end, TransportMode::Car).await;

    assert_eq!(router.call_count(), 1);
    assert_eq!(route.source, RouteSource::Fallback);
    assert_eq!(route.steps.len(), 1);
    assert!(within_percent(route.total_distance_meters, 5_000.0, 1.0));
    assert!(within_percent(route.total_duration_seconds, 360.0, 1.0));
    assert_eq!(route.geometry, vec![start, end]);
}

#[tokio::test]
async fn train_fallback_uses_train_speed() {
    let router = FakeRouter::failing(503);
    let adapter = RouteProviderAdapter::new(&router);

    let route = adapter
        .compute_route(coord(0.0, 0.0), east_on_equator(5_000.0), TransportMode::Train)
        .await;

    assert!(within_percent(route.total_duration_seconds, 225.0, 1.0));
}

#[tokio::test]
async fn unknown_destination_never_reaches_the_router() {
    let geocoder = FakeGeocoder::default();
    let router = FakeRouter::healthy();
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);
    let session = Mutex::new(NavigationSession::new());

    let err = navigator
        .navigate(&session, coord(1.3521, 103.8198), "Atlantis", TransportMode::Car)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DestinationNotFound(ref q) if q == "Atlantis"));
    assert_eq!(router.call_count(), 0);
    assert_eq!(session.lock().unwrap().state(), &SessionState::Idle);

    let plain = navigator.destinations().resolve_text("Atlantis").await.unwrap();
    assert!(plain.is_none());
}

#[tokio::test]
async fn unreachable_geocoder_is_surfaced() {
    let geocoder = FakeGeocoder {
        search_fails: true,
        ..FakeGeocoder::default()
    };
    let router = FakeRouter::healthy();
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);

    let err = navigator
        .plan(coord(1.3521, 103.8198), "Marina Bay Sands", TransportMode::Bus)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GeocodingUnavailable(_)));
    assert_eq!(router.call_count(), 0);
}

#[tokio::test]
async fn blank_destination_is_not_sent() {
    let geocoder = FakeGeocoder::default();
    let router = FakeRouter::healthy();
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);

    let err = navigator
        .plan(coord(1.3521, 103.8198), "   ", TransportMode::Car)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DestinationNotFound(_)));
    assert_eq!(geocoder.search_count(), 0);
}

#[tokio::test]
async fn successful_navigate_installs_provider_route() {
    let marina = coord(1.2834, 103.8607);
    let geocoder = FakeGeocoder::default().with_destination("Marina Bay Sands", marina);
    let router = FakeRouter::healthy();
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);
    let session = Mutex::new(NavigationSession::new());

    let route = navigator
        .navigate(&session, coord(1.3521, 103.8198), "Marina Bay Sands", TransportMode::Car)
        .await
        .unwrap();

    assert_eq!(route.source, RouteSource::Provider);
    assert_eq!(route.end(), Some(marina));

    let mut session = session.lock().unwrap();
    assert_eq!(session.route(), Some(&route));
    assert_eq!(session.current_step_index(), 0);
    assert_eq!(session.advance(), 1);
    assert_eq!(session.advance(), 1);
}

#[tokio::test]
async fn fallback_instruction_names_the_destination() {
    let geocoder = FakeGeocoder::default().with_destination("Changi Airport", coord(1.3644, 103.9915));
    let router = FakeRouter::failing(500);
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);

    let route = navigator
        .plan(coord(1.3521, 103.8198), "Changi Airport", TransportMode::Bus)
        .await
        .unwrap();

    assert!(route.is_fallback());
    assert!(route.steps[0].instruction.contains("Changi Airport"));
    assert!(route.steps[0].instruction.contains("by bus"));
}

#[tokio::test(start_paused = true)]
async fn slower_earlier_navigate_does_not_overwrite_newer_one() {
    let slow_target = coord(1.2834, 103.8607);
    let fast_target = coord(1.3644, 103.9915);
    let geocoder = FakeGeocoder::default()
        .with_destination("Marina Bay Sands", slow_target)
        .with_destination("Changi Airport", fast_target);
    let router = FakeRouter::healthy()
        .with_delay(slow_target, Duration::from_secs(5))
        .with_delay(fast_target, Duration::from_secs(1));
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);
    let session = Mutex::new(NavigationSession::new());
    let start = coord(1.3521, 103.8198);

    let (first, second) = tokio::join!(
        navigator.navigate(&session, start, "Marina Bay Sands", TransportMode::Car),
        navigator.navigate(&session, start, "Changi Airport", TransportMode::Car),
    );

    assert!(matches!(first, Err(Error::Superseded(1))));
    let second = second.unwrap();
    assert_eq!(second.end(), Some(fast_target));
    assert_eq!(session.lock().unwrap().route().and_then(RouteInfo::end), Some(fast_target));
}

#[tokio::test]
async fn locate_resolves_the_reported_fix() {
    let here = coord(1.3521, 103.8198);
    let geocoder = FakeGeocoder::default().with_reverse(
        ZOOM_BUILDING,
        true,
        place("Orchard Road, Singapore", here, road("Orchard Road")),
    );
    let router = FakeRouter::healthy();
    let navigator = Navigator::new(&geocoder, &router, LOCATION_TIMEOUT);

    let located = navigator
        .locate(ReportedFix::Position {
            lat: 1.3521,
            lon: 103.8198,
            accuracy_meters: Some(30.0),
        })
        .await
        .unwrap();

    assert_eq!(located.observation.coordinate, here);
    assert_eq!(located.address.formatted_address, "Orchard Road, Singapore");

    let denied = navigator
        .locate(ReportedFix::Failed(SensorError::PermissionDenied))
        .await;
    assert!(matches!(denied, Err(Error::LocationDenied)));
    assert_eq!(geocoder.reverse_queries().len(), 1);
}
