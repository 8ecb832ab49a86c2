use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use wayfinder_core::Error as EngineError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Unknown session {0}")]
    UnknownSession(u64),
    #[error("Session {0} has no route")]
    NoRoute(u64),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(err) => match err {
                EngineError::DestinationNotFound(_) => StatusCode::NOT_FOUND,
                EngineError::GeocodingUnavailable(_)
                | EngineError::LocationUnavailable
                | EngineError::ResolutionFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
                EngineError::LocationDenied => StatusCode::FORBIDDEN,
                EngineError::LocationTimeout => StatusCode::GATEWAY_TIMEOUT,
                EngineError::Superseded(_) => StatusCode::CONFLICT,
                EngineError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
                EngineError::InvalidData(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::UnknownSession(_) | ApiError::NoRoute(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
