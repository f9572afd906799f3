///! HTTP routes over the flight snapshot
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracker_common::{ErrorBody, FlightList, FlightRecord, StatusReport};

use crate::module::flights::{FlightQuery, QueryError};

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        match self {
            QueryError::NotFound(id) => {
                tracing::debug!("Flight {} not found", id);
                let body = ErrorBody {
                    error: "Flight not found".to_string(),
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
        }
    }
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn list_flights(State(query): State<FlightQuery>) -> Json<FlightList> {
    Json(query.list_flights())
}

async fn get_flight(
    State(query): State<FlightQuery>,
    Path(id): Path<String>,
) -> Result<Json<FlightRecord>, QueryError> {
    query.get_flight(&id).map(Json)
}

async fn status(State(query): State<FlightQuery>) -> Json<StatusReport> {
    Json(query.status())
}

/// Build the application router.
///
/// When `static_dir` is set, unmatched paths are served from that directory.
pub fn router(query: FlightQuery, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/api/flights", get(list_flights))
        .route("/api/flight/{id}", get(get_flight))
        .route("/api/status", get(status))
        .with_state(query);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
