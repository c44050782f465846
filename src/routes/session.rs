use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::session::{GameSummaryDto, SnapshotDto, StartSessionRequest, TapRequest, TapResponse},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes driving the session lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(get_snapshot))
        .route("/session/start", post(start_session))
        .route("/session/daily", post(start_daily))
        .route("/session/tap", post(tap))
        .route("/session/stop", post(stop))
        .route("/session/dismiss", post(dismiss))
        .route("/session/summary", get(summary))
}

/// Current game state.
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses((status = 200, description = "Current snapshot", body = SnapshotDto))
)]
pub async fn get_snapshot(State(state): State<SharedState>) -> Json<SnapshotDto> {
    Json(session_service::snapshot(&state).await)
}

/// Begin the countdown for a configured tier. Ignored while a session runs.
#[utoipa::path(
    post,
    path = "/session/start",
    tag = "session",
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Snapshot after the request", body = SnapshotDto),
        (status = 404, description = "Unknown tier")
    )
)]
pub async fn start_session(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<StartSessionRequest>>,
) -> Result<Json<SnapshotDto>, AppError> {
    let snapshot = session_service::start_session(&state, &payload.tier).await?;
    Ok(Json(snapshot))
}

/// Begin the countdown for today's daily challenge.
#[utoipa::path(
    post,
    path = "/session/daily",
    tag = "session",
    responses((status = 200, description = "Snapshot after the request", body = SnapshotDto))
)]
pub async fn start_daily(State(state): State<SharedState>) -> Json<SnapshotDto> {
    Json(session_service::start_daily(&state).await)
}

/// Tap a tile.
#[utoipa::path(
    post,
    path = "/session/tap",
    tag = "session",
    request_body = TapRequest,
    responses(
        (status = 200, description = "Tap classification and snapshot", body = TapResponse),
        (status = 400, description = "Invalid tile value")
    )
)]
pub async fn tap(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TapRequest>>,
) -> Json<TapResponse> {
    Json(session_service::tap(&state, payload.value).await)
}

/// Abort the active session.
#[utoipa::path(
    post,
    path = "/session/stop",
    tag = "session",
    responses((status = 200, description = "Snapshot after the request", body = SnapshotDto))
)]
pub async fn stop(State(state): State<SharedState>) -> Json<SnapshotDto> {
    Json(session_service::stop(&state).await)
}

/// Close the summary and return to idle.
#[utoipa::path(
    post,
    path = "/session/dismiss",
    tag = "session",
    responses((status = 200, description = "Snapshot after the request", body = SnapshotDto))
)]
pub async fn dismiss(State(state): State<SharedState>) -> Json<SnapshotDto> {
    Json(session_service::dismiss(&state).await)
}

/// Summary of the last finished session.
#[utoipa::path(
    get,
    path = "/session/summary",
    tag = "session",
    responses(
        (status = 200, description = "Last result", body = GameSummaryDto),
        (status = 404, description = "No session finished yet")
    )
)]
pub async fn summary(State(state): State<SharedState>) -> Result<Json<GameSummaryDto>, AppError> {
    let summary = session_service::summary(&state).await?;
    Ok(Json(summary))
}
