//! Application-level configuration loading: difficulty tiers, tile palette,
//! fun facts and the key-value store location.

use std::{collections::HashSet, env, fs, io::ErrorKind, path::PathBuf};

use rand::{Rng, seq::IndexedRandom};
use serde::Deserialize;
use tracing::{info, warn};

use crate::state::tier::{DAILY_TIER_LABEL, DifficultyTier, default_tiers};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "NUMBER_CLICK_CONFIG_PATH";
/// Default location of the key-value document.
const DEFAULT_STORE_PATH: &str = "data/store.json";
/// Environment variable that overrides the key-value document location.
const STORE_PATH_ENV: &str = "NUMBER_CLICK_STORE_PATH";
/// Tier selected before the player picks one.
const DEFAULT_TIER_LABEL: &str = "Medium";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    tiers: Vec<DifficultyTier>,
    default_tier: String,
    button_colors: Vec<String>,
    fun_facts: Vec<String>,
    store_path: PathBuf,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        tiers = app_config.tiers.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Some(store_path) = env::var_os(STORE_PATH_ENV).filter(|value| !value.is_empty()) {
            config.store_path = PathBuf::from(store_path);
        }
        config
    }

    /// Configured difficulty tiers, in display order.
    pub fn tiers(&self) -> &[DifficultyTier] {
        &self.tiers
    }

    /// Tier shown before the player picks one.
    pub fn default_tier(&self) -> DifficultyTier {
        self.tiers
            .iter()
            .find(|tier| tier.label == self.default_tier)
            .or_else(|| self.tiers.first())
            .cloned()
            .unwrap_or_else(|| DifficultyTier::new(DEFAULT_TIER_LABEL, 20))
    }

    /// Allowed tile colours.
    pub fn button_colors(&self) -> &[String] {
        &self.button_colors
    }

    /// Palette entry matching `color` case-insensitively.
    pub fn palette_color(&self, color: &str) -> Option<&str> {
        let color = color.trim();
        self.button_colors
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(color))
            .map(String::as_str)
    }

    /// Pick a fun fact for a summary screen.
    pub fn random_fun_fact<R>(&self, rng: &mut R) -> Option<&str>
    where
        R: Rng + ?Sized,
    {
        self.fun_facts.choose(rng).map(String::as_str)
    }

    /// Location of the key-value document.
    pub fn store_path(&self) -> &PathBuf {
        &self.store_path
    }

    /// Replace the tier set, keeping only valid entries.
    pub fn with_tiers(mut self, tiers: Vec<DifficultyTier>) -> Self {
        self.tiers = sanitize_tiers(tiers);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            default_tier: DEFAULT_TIER_LABEL.to_string(),
            button_colors: default_button_colors(),
            fun_facts: default_fun_facts(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    tiers: Vec<RawTier>,
    #[serde(default)]
    default_tier: Option<String>,
    #[serde(default)]
    button_colors: Vec<String>,
    #[serde(default)]
    fun_facts: Vec<String>,
    #[serde(default)]
    store_path: Option<PathBuf>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let tiers = sanitize_tiers(value.tiers.into_iter().map(Into::into).collect());
        Self {
            tiers: if tiers.is_empty() { defaults.tiers } else { tiers },
            default_tier: value.default_tier.unwrap_or(defaults.default_tier),
            button_colors: if value.button_colors.is_empty() {
                defaults.button_colors
            } else {
                value.button_colors
            },
            fun_facts: if value.fun_facts.is_empty() {
                defaults.fun_facts
            } else {
                value.fun_facts
            },
            store_path: value.store_path.unwrap_or(defaults.store_path),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single tier inside the configuration file.
struct RawTier {
    label: String,
    size: u32,
}

impl From<RawTier> for DifficultyTier {
    fn from(value: RawTier) -> Self {
        DifficultyTier::new(value.label.trim(), value.size)
    }
}

/// Drop tiers with an empty, duplicate or reserved label, or no tiles.
fn sanitize_tiers(tiers: Vec<DifficultyTier>) -> Vec<DifficultyTier> {
    let mut seen = HashSet::new();
    tiers
        .into_iter()
        .filter(|tier| {
            let valid = !tier.label.is_empty()
                && tier.label != DAILY_TIER_LABEL
                && tier.size >= 1
                && seen.insert(tier.label.clone());
            if !valid {
                warn!(tier = %tier.label, size = tier.size, "ignoring invalid tier");
            }
            valid
        })
        .collect()
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn default_button_colors() -> Vec<String> {
    [
        "#007AFF", "#4F8EF7", "#FF6F61", "#34C759", "#FFD700", "#A259FF", "#FF9500",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_fun_facts() -> Vec<String> {
    [
        "Did you know? The fastest human reaction time is about 0.15 seconds!",
        "Tip: Try to scan the grid in rows or columns for speed.",
        "Quote: \"Success is the sum of small efforts, repeated day in and day out.\"",
        "Fun Fact: Playing brain games can improve your cognitive speed!",
        "Tip: Use your dominant hand for faster tapping.",
        "Quote: \"The only way to do great work is to love what you do.\" - Steve Jobs",
        "Did you know? Practice can help you break your own records!",
        "Tip: Stay relaxed for better accuracy and speed.",
        "Quote: \"Winners are not people who never fail, but people who never quit.\"",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn defaults_select_medium() {
        let config = AppConfig::default();
        assert_eq!(config.tiers().len(), 3);
        assert_eq!(config.default_tier(), DifficultyTier::new("Medium", 20));
        assert_eq!(config.palette_color(" #ff6f61"), Some("#FF6F61"));
        assert_eq!(config.palette_color("#000000"), None);
    }

    #[test]
    fn raw_config_drops_invalid_tiers() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "tiers": [
                    {"label": "Tiny", "size": 4},
                    {"label": "Daily", "size": 10},
                    {"label": "Tiny", "size": 8},
                    {"label": "Zero", "size": 0}
                ],
                "defaultTier": "Tiny"
            }"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.tiers(), &[DifficultyTier::new("Tiny", 4)]);
        assert_eq!(config.default_tier().label, "Tiny");
        assert_eq!(config.button_colors().len(), 7);
    }

    #[test]
    fn unknown_default_falls_back_to_first_tier() {
        let raw: RawConfig = serde_json::from_str(r#"{"defaultTier": "Nope"}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.default_tier().label, "Easy");
    }

    #[test]
    fn fun_fact_comes_from_the_list() {
        let config = AppConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let fact = config.random_fun_fact(&mut rng).unwrap();
        assert!(default_fun_facts().iter().any(|candidate| candidate == fact));
    }
}
