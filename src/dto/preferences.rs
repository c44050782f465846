use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::preferences::{ColorScheme, Preferences, PreferencesPatch};

/// Current preferences.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDto {
    /// Display name.
    pub nickname: String,
    /// Tile colour, null for the scheme default.
    pub button_color: Option<String>,
    /// Randomised tile shapes.
    pub chaos_mode: bool,
    /// Light or dark scheme.
    pub color_scheme: ColorScheme,
    /// Colours accepted for `buttonColor`.
    pub palette: Vec<String>,
}

impl PreferencesDto {
    /// Pair preferences with the configured palette.
    pub fn new(preferences: Preferences, palette: &[String]) -> Self {
        Self {
            nickname: preferences.nickname,
            button_color: preferences.button_color,
            chaos_mode: preferences.chaos_mode,
            color_scheme: preferences.color_scheme,
            palette: palette.to_vec(),
        }
    }
}

/// Partial update; omitted fields are kept, `buttonColor: null` clears the colour.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    /// New nickname; blank resets to the default.
    #[validate(length(max = 64))]
    pub nickname: Option<String>,
    /// New tile colour from the palette, or null.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable)]
    pub button_color: Option<Option<String>>,
    /// New chaos flag.
    pub chaos_mode: Option<bool>,
    /// New scheme.
    pub color_scheme: Option<ColorScheme>,
}

/// Distinguish an explicit `null` from an omitted field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdatePreferencesRequest> for PreferencesPatch {
    fn from(value: UpdatePreferencesRequest) -> Self {
        Self {
            nickname: value.nickname,
            button_color: value.button_color,
            chaos_mode: value.chaos_mode,
            color_scheme: value.color_scheme,
        }
    }
}
