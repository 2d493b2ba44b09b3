//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{LineId, StationId};
use crate::service::{ErrorKind, ServiceError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_stations))
        .route("/stations/:id", delete(delete_station))
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(find_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(add_section).delete(remove_station),
        )
        .route("/lines/:id/fare", get(quote_fare))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it when it is malformed.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

async fn create_station(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<StationResponse>), AppError> {
    let req: StationRequest = parse_json(&body)?;
    let station = state.subway.create_station(&req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(StationResponse::from_station(&station)),
    ))
}

async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let stations = state.subway.stations().await?;
    Ok(Json(stations.iter().map(StationResponse::from_station).collect()))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<StationId>,
) -> Result<StatusCode, AppError> {
    state.subway.delete_station(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_line(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    let req: LineRequest = parse_json(&body)?;
    let line = state.subway.create_line(req.into_new_line()).await?;
    Ok((StatusCode::CREATED, Json(LineResponse::from_line(&line))))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let lines = state.subway.lines().await?;
    Ok(Json(lines.iter().map(LineResponse::from_line).collect()))
}

async fn find_line(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state.subway.line(id).await?;
    Ok(Json(LineResponse::from_line(&line)))
}

async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let req: LineUpdateRequest = parse_json(&body)?;
    let line = state
        .subway
        .update_line(id, &req.name, &req.color, req.extra_fare.unwrap_or(0))
        .await?;
    Ok(Json(LineResponse::from_line(&line)))
}

async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
) -> Result<StatusCode, AppError> {
    state.subway.delete_line(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_section(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let req: SectionRequest = parse_json(&body)?;
    let line = state.subway.add_section(id, req.into_new_section()).await?;
    Ok(Json(LineResponse::from_line(&line)))
}

async fn remove_station(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    Query(query): Query<StationQuery>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state.subway.remove_station(id, query.station_id).await?;
    Ok(Json(LineResponse::from_line(&line)))
}

async fn quote_fare(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    Query(query): Query<FareQuery>,
) -> Result<Json<FareResponse>, AppError> {
    let quote = state
        .subway
        .quote_fare(id, query.source, query.target)
        .await?;
    Ok(Json(FareResponse::from_quote(&quote)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e.kind() {
            ErrorKind::Validation | ErrorKind::Topology => AppError::BadRequest { message },
            ErrorKind::NotFound => AppError::NotFound { message },
            ErrorKind::Conflict => AppError::Conflict { message },
            ErrorKind::Corrupt | ErrorKind::Storage => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
