use tracing::info;

use crate::{
    dto::preferences::{PreferencesDto, UpdatePreferencesRequest},
    error::ServiceError,
    services::sse_events,
    state::{SharedState, preferences::PreferencesPatch},
};

/// Current preferences with the palette.
pub fn current(state: &SharedState) -> PreferencesDto {
    PreferencesDto::new(state.preferences(), state.config().button_colors())
}

/// Apply a partial update, persisting and publishing only when something changed.
pub fn update(
    state: &SharedState,
    request: UpdatePreferencesRequest,
) -> Result<PreferencesDto, ServiceError> {
    let mut patch = PreferencesPatch::from(request);
    if let Some(Some(color)) = &patch.button_color {
        let canonical = state
            .config()
            .palette_color(color)
            .ok_or_else(|| ServiceError::InvalidInput(format!("`{color}` is not in the palette")))?;
        patch.button_color = Some(Some(canonical.to_string()));
    }

    let mut writes = Vec::new();
    let changed = state.preferences_sender().send_if_modified(|preferences| {
        writes = preferences.apply(patch);
        !writes.is_empty()
    });

    let dto = current(state);
    if changed {
        info!(keys = writes.len(), "preferences updated");
        state.persistence().submit(writes);
        sse_events::broadcast_preferences(state, &dto);
    }
    Ok(dto)
}
