use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::progress::{BadgesResponse, DailyResponse, LeaderboardResponse, TiersResponse},
    error::AppError,
    services::progress_service,
    state::SharedState,
};

/// Read-only progression routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/tiers", get(tiers))
        .route("/leaderboards/{tier}", get(leaderboard))
        .route("/badges", get(badges))
        .route("/daily", get(daily))
}

/// List the configured tiers.
#[utoipa::path(
    get,
    path = "/tiers",
    tag = "progress",
    responses((status = 200, description = "Tier catalogue", body = TiersResponse))
)]
pub async fn tiers(State(state): State<SharedState>) -> Json<TiersResponse> {
    Json(progress_service::tiers(&state).await)
}

/// Ranked times and personal best of a tier.
#[utoipa::path(
    get,
    path = "/leaderboards/{tier}",
    tag = "progress",
    params(("tier" = String, Path, description = "Tier label, or `Daily`")),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 404, description = "Unknown tier")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Path(tier): Path<String>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let response = progress_service::leaderboard(&state, &tier).await?;
    Ok(Json(response))
}

/// Earned badges and games played.
#[utoipa::path(
    get,
    path = "/badges",
    tag = "progress",
    responses((status = 200, description = "Badge ledger", body = BadgesResponse))
)]
pub async fn badges(State(state): State<SharedState>) -> Json<BadgesResponse> {
    Json(progress_service::badges(&state).await)
}

/// Today's challenge and the streak.
#[utoipa::path(
    get,
    path = "/daily",
    tag = "progress",
    responses((status = 200, description = "Daily view", body = DailyResponse))
)]
pub async fn daily(State(state): State<SharedState>) -> Json<DailyResponse> {
    Json(progress_service::daily(&state).await)
}
