use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::{
    keys,
    models::{KvWrite, encode_flag},
};

/// Nickname shown when the player never chose one.
pub const DEFAULT_NICKNAME: &str = "Player";
/// Longest accepted nickname, in characters.
pub const MAX_NICKNAME_CHARS: usize = 24;

/// Light or dark presentation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light backgrounds.
    #[default]
    Light,
    /// Dark backgrounds.
    Dark,
}

impl ColorScheme {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    /// Parse the stored representation.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(ColorScheme::Light),
            "dark" => Some(ColorScheme::Dark),
            _ => None,
        }
    }
}

/// Player-chosen presentation settings. Not consulted by the game rules; the
/// engine only stores them and hands them to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Display name shown on summaries and leaderboards.
    pub nickname: String,
    /// Tile colour from the configured palette; `None` uses the scheme default.
    pub button_color: Option<String>,
    /// Randomised tile shapes.
    pub chaos_mode: bool,
    /// Light or dark scheme.
    pub color_scheme: ColorScheme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            button_color: None,
            chaos_mode: false,
            color_scheme: ColorScheme::default(),
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    /// New nickname; blank resets to the default.
    pub nickname: Option<String>,
    /// `Some(None)` clears the colour.
    pub button_color: Option<Option<String>>,
    /// New chaos flag.
    pub chaos_mode: Option<bool>,
    /// New scheme.
    pub color_scheme: Option<ColorScheme>,
}

/// Trim a nickname, falling back to [`DEFAULT_NICKNAME`] when blank.
pub fn normalize_nickname(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_NICKNAME.to_string()
    } else {
        trimmed.chars().take(MAX_NICKNAME_CHARS).collect()
    }
}

impl Preferences {
    /// Apply `patch` and describe the writes for the keys that changed.
    pub fn apply(&mut self, patch: PreferencesPatch) -> Vec<KvWrite> {
        let mut writes = Vec::new();

        if let Some(nickname) = patch.nickname {
            let nickname = normalize_nickname(&nickname);
            if nickname != self.nickname {
                writes.push(KvWrite::set(keys::NICKNAME, nickname.as_str()));
                self.nickname = nickname;
            }
        }

        if let Some(color) = patch.button_color {
            if color != self.button_color {
                writes.push(match &color {
                    Some(color) => KvWrite::set(keys::BUTTON_COLOR, color.as_str()),
                    None => KvWrite::remove(keys::BUTTON_COLOR),
                });
                self.button_color = color;
            }
        }

        if let Some(chaos_mode) = patch.chaos_mode {
            if chaos_mode != self.chaos_mode {
                writes.push(KvWrite::set(keys::CHAOS_MODE, encode_flag(chaos_mode)));
                self.chaos_mode = chaos_mode;
            }
        }

        if let Some(scheme) = patch.color_scheme {
            if scheme != self.color_scheme {
                writes.push(KvWrite::set(keys::COLOR_SCHEME, scheme.as_str()));
                self.color_scheme = scheme;
            }
        }

        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_nickname_falls_back() {
        assert_eq!(normalize_nickname("   "), DEFAULT_NICKNAME);
        assert_eq!(normalize_nickname("  Ada "), "Ada");
        assert_eq!(
            normalize_nickname(&"x".repeat(40)).chars().count(),
            MAX_NICKNAME_CHARS
        );
    }

    #[test]
    fn only_changed_keys_are_written() {
        let mut prefs = Preferences::default();
        let writes = prefs.apply(PreferencesPatch {
            nickname: Some("Player".into()),
            chaos_mode: Some(true),
            button_color: Some(Some("#FF6F61".into())),
            ..Default::default()
        });
        assert_eq!(
            writes,
            vec![
                KvWrite::set("buttonColor", "#FF6F61"),
                KvWrite::set("chaosMode", "true"),
            ]
        );
        assert!(prefs.chaos_mode);
    }

    #[test]
    fn clearing_colour_removes_key() {
        let mut prefs = Preferences {
            button_color: Some("#34C759".into()),
            ..Default::default()
        };
        let writes = prefs.apply(PreferencesPatch {
            button_color: Some(None),
            color_scheme: Some(ColorScheme::Dark),
            ..Default::default()
        });
        assert_eq!(
            writes,
            vec![
                KvWrite::remove("buttonColor"),
                KvWrite::set("colorScheme", "dark"),
            ]
        );
        assert_eq!(prefs.button_color, None);
    }

    #[test]
    fn scheme_parsing() {
        assert_eq!(ColorScheme::parse("dark"), Some(ColorScheme::Dark));
        assert_eq!(ColorScheme::parse("sepia"), None);
    }
}
