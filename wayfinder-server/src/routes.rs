//! HTTP surface of the navigation screen
//!
//! Sessions are held server side; the client reports device fixes and
//! drives the step cursor.

use std::sync::{Arc, Mutex, PoisonError};

use axum::error_handling::HandleErrorLayer;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wayfinder_core::location::{ReportedFix, SensorError};
use wayfinder_core::navigator::LocatedDevice;
use wayfinder_core::session::{NavigationSession, SessionView};
use wayfinder_core::{Coordinate, GeocodingProvider, RoutingProvider, TransportMode};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::state::AppState;

type SharedState<G, R> = Arc<AppState<G, R>>;

/// Outcome of the browser's geolocation request
#[derive(Debug, Default, Deserialize)]
pub struct LocateRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub accuracy: Option<f64>,
    /// `GeolocationPositionError.code` when the request failed
    pub error_code: Option<u16>,
    /// `false` when the browser has no geolocation support
    pub supported: Option<bool>,
}

impl LocateRequest {
    fn into_fix(self) -> Result<ReportedFix, ApiError> {
        if self.supported == Some(false) {
            return Ok(ReportedFix::Failed(SensorError::Unsupported));
        }
        if let Some(code) = self.error_code {
            return Ok(ReportedFix::Failed(SensorError::from_code(code)));
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(ReportedFix::Position {
                lat,
                lon,
                accuracy_meters: self.accuracy,
            }),
            _ => Err(ApiError::BadRequest(
                "either lat/lon or error_code is required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StartPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub start: StartPoint,
    pub destination: String,
    #[serde(default)]
    pub mode: TransportMode,
}

#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub id: u64,
}

/// Builds the application router with its middleware stack.
pub fn app<G, R>(state: SharedState<G, R>, server: &ServerConfig) -> Router
where
    G: GeocodingProvider + 'static,
    R: RoutingProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/locate", post(locate::<G, R>))
        .route("/sessions", post(create_session::<G, R>))
        .route(
            "/sessions/{id}",
            get(show_session::<G, R>).delete(delete_session::<G, R>),
        )
        .route("/sessions/{id}/navigate", post(navigate::<G, R>))
        .route("/sessions/{id}/advance", post(advance::<G, R>))
        .route("/sessions/{id}/retreat", post(retreat::<G, R>))
        .route("/sessions/{id}/route.geojson", get(route_geojson::<G, R>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(server.request_timeout())
                .layer(GlobalConcurrencyLimitLayer::new(server.concurrency_limit.max(1)))
                .into_inner(),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unhandled internal error: {err}"),
        )
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn locate<G, R>(
    State(state): State<SharedState<G, R>>,
    Json(request): Json<LocateRequest>,
) -> Result<Json<LocatedDevice>, ApiError>
where
    G: GeocodingProvider + 'static,
    R: RoutingProvider + 'static,
{
    let fix = request.into_fix()?;
    Ok(Json(state.navigator.locate(fix).await?))
}

async fn create_session<G, R>(
    State(state): State<SharedState<G, R>>,
) -> (StatusCode, Json<CreatedSession>) {
    let id = state.create_session();
    tracing::info!(session = id, "session opened");
    (StatusCode::CREATED, Json(CreatedSession { id }))
}

async fn show_session<G, R>(
    State(state): State<SharedState<G, R>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| Json(session.view()))
}

async fn delete_session<G, R>(
    State(state): State<SharedState<G, R>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(id) {
        tracing::info!(session = id, "session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::UnknownSession(id))
    }
}

async fn navigate<G, R>(
    State(state): State<SharedState<G, R>>,
    Path(id): Path<u64>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionView>, ApiError>
where
    G: GeocodingProvider + 'static,
    R: RoutingProvider + 'static,
{
    let session = state.session(id).ok_or(ApiError::UnknownSession(id))?;
    let start = Coordinate::new(request.start.lat, request.start.lon)?;

    let route = state
        .navigator
        .navigate(&session, start, &request.destination, request.mode)
        .await?;
    tracing::info!(
        session = id,
        source = ?route.source,
        distance_meters = route.total_distance_meters,
        "route installed"
    );

    Ok(Json(lock(&session).view()))
}

async fn advance<G, R>(
    State(state): State<SharedState<G, R>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.advance();
        Json(session.view())
    })
}

async fn retreat<G, R>(
    State(state): State<SharedState<G, R>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.retreat();
        Json(session.view())
    })
}

async fn route_geojson<G, R>(
    State(state): State<SharedState<G, R>>,
    Path(id): Path<u64>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let collection = with_session(&state, id, |session| {
        session.route().map(|route| route.to_geojson())
    })?
    .ok_or(ApiError::NoRoute(id))??;
    Ok(Json(collection))
}

fn with_session<G, R, T>(
    state: &AppState<G, R>,
    id: u64,
    f: impl FnOnce(&mut NavigationSession) -> T,
) -> Result<T, ApiError> {
    let session = state.session(id).ok_or(ApiError::UnknownSession(id))?;
    let mut guard = lock(&session);
    Ok(f(&mut guard))
}

fn lock(session: &Mutex<NavigationSession>) -> std::sync::MutexGuard<'_, NavigationSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
