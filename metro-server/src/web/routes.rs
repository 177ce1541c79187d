//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::domain::{InvalidStationName, StationName};
use crate::graph::UnknownStation;
use crate::planner::RouteError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(stations))
        .route("/lines", get(lines))
        .route("/route", get(route))
        .route("/nearest-station", post(nearest_station))
        .route("/weather/current", get(current_weather))
        .route("/weather/impact", get(weather_impact))
        .route("/routes/history", get(route_history))
        .route("/admin/station/:name/close", post(close_station))
        .route("/admin/station/:name/open", post(open_station))
        .route("/admin/station/:name/congestion", post(set_congestion))
        .with_state(state)
}

/// Errors mapped onto HTTP responses.
///
/// Not-found and no-path are distinct outcomes: a missing station is a
/// 404, a disconnected pair is a 409 with its own message.
enum AppError {
    BadRequest(String),
    NotFound(String),
    NoPath(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            AppError::NotFound(error) => (StatusCode::NOT_FOUND, error),
            AppError::NoPath(error) => (StatusCode::CONFLICT, error),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<InvalidStationName> for AppError {
    fn from(err: InvalidStationName) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        match &err {
            RouteError::NotFound(_) => AppError::NotFound(err.to_string()),
            RouteError::NoPath { .. } => AppError::NoPath(err.to_string()),
        }
    }
}

impl From<UnknownStation> for AppError {
    fn from(err: UnknownStation) -> Self {
        AppError::NotFound(err.to_string())
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations with their runtime state.
async fn stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let stations = state
        .system
        .stations()
        .await
        .iter()
        .map(StationDto::from)
        .collect();
    Json(StationsResponse { stations })
}

/// All lines with their station sequences and colors.
async fn lines(State(state): State<AppState>) -> Json<LinesResponse> {
    let lines = state.system.lines().iter().map(LineDto::from).collect();
    Json(LinesResponse { lines })
}

/// Plan a route between two stations.
async fn route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let origin = StationName::parse(&query.origin)?;
    let destination = StationName::parse(&query.destination)?;
    let record = state.system.find_route(&origin, &destination).await?;
    Ok(Json(RouteResponse {
        route: RouteDto::from(&record),
    }))
}

/// Find the station nearest to a coordinate.
async fn nearest_station(
    State(state): State<AppState>,
    Json(request): Json<NearestStationRequest>,
) -> Result<Json<NearestStationResponse>, AppError> {
    if !request.latitude.is_finite() || !request.longitude.is_finite() {
        return Err(AppError::BadRequest(
            "latitude and longitude must be finite numbers".to_string(),
        ));
    }
    state
        .system
        .nearest_station(request.latitude, request.longitude)
        .await
        .map(|nearest| Json(NearestStationResponse::from(&nearest)))
        .ok_or_else(|| AppError::NotFound("the network has no stations".to_string()))
}

/// Current weather at every station.
async fn current_weather(State(state): State<AppState>) -> Json<WeatherResponse> {
    let update = state.system.current_weather().await;
    Json(WeatherResponse::from(update.as_ref()))
}

/// Compare a route against forced clear skies.
async fn weather_impact(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<ImpactResponse>, AppError> {
    let origin = StationName::parse(&query.origin)?;
    let destination = StationName::parse(&query.destination)?;
    let report = state.system.weather_impact(&origin, &destination).await?;
    Ok(Json(ImpactResponse::from(report)))
}

/// Recorded routes, most recent first.
async fn route_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let routes: Vec<RouteDto> = state
        .system
        .history()
        .await
        .iter()
        .map(RouteDto::from)
        .collect();
    let total = routes.len();
    Json(HistoryResponse { routes, total })
}

/// Close a station.
async fn close_station(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<CloseStationQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let station = StationName::parse(&name)?;
    let reason = query.reason.unwrap_or_else(|| "maintenance".to_string());
    state.system.close_station(&station, &reason).await?;
    Ok(Json(MessageResponse {
        message: format!("station {station} closed"),
    }))
}

/// Reopen a station.
async fn open_station(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let station = StationName::parse(&name)?;
    state.system.open_station(&station).await?;
    Ok(Json(MessageResponse {
        message: format!("station {station} reopened"),
    }))
}

/// Set a station's congestion multiplier.
async fn set_congestion(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<CongestionQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let station = StationName::parse(&name)?;
    if !query.level.is_finite() || query.level <= 0.0 {
        return Err(AppError::BadRequest(
            "congestion level must be a positive number".to_string(),
        ));
    }
    state.system.set_congestion(&station, query.level).await?;
    Ok(Json(MessageResponse {
        message: format!("congestion updated for {station}"),
    }))
}
