use axum::{Json, Router, extract::State, routing::get};
use axum_valid::Valid;

use crate::{
    dto::preferences::{PreferencesDto, UpdatePreferencesRequest},
    error::AppError,
    services::preferences_service,
    state::SharedState,
};

/// Preference routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/preferences", get(get_preferences).put(update_preferences))
}

/// Current preferences and palette.
#[utoipa::path(
    get,
    path = "/preferences",
    tag = "preferences",
    responses((status = 200, description = "Preferences", body = PreferencesDto))
)]
pub async fn get_preferences(State(state): State<SharedState>) -> Json<PreferencesDto> {
    Json(preferences_service::current(&state))
}

/// Update some preferences.
#[utoipa::path(
    put,
    path = "/preferences",
    tag = "preferences",
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, description = "Preferences after the update", body = PreferencesDto),
        (status = 400, description = "Colour outside the palette or invalid nickname")
    )
)]
pub async fn update_preferences(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<UpdatePreferencesRequest>>,
) -> Result<Json<PreferencesDto>, AppError> {
    let preferences = preferences_service::update(&state, payload)?;
    Ok(Json(preferences))
}
