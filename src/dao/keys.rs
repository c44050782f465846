//! Storage keys owned by the progression engine. Each aggregate is the sole
//! writer of its own keys.

/// Key holding the list of earned badge identifiers.
pub const BADGES: &str = "badges";
/// Key holding the games-played counter.
pub const GAMES_PLAYED: &str = "gamesPlayed";
/// Key holding the daily streak length.
pub const DAILY_STREAK: &str = "dailyStreak";
/// Key holding the date key of the last credited daily challenge.
pub const LAST_DAILY_DATE: &str = "lastDailyDate";

/// Preference key: player nickname.
pub const NICKNAME: &str = "nickname";
/// Preference key: tile colour.
pub const BUTTON_COLOR: &str = "buttonColor";
/// Preference key: chaos mode flag.
pub const CHAOS_MODE: &str = "chaosMode";
/// Preference key: light or dark scheme.
pub const COLOR_SCHEME: &str = "colorScheme";

/// Key holding the personal best of a tier.
pub fn high_score(tier_label: &str) -> String {
    format!("highscore_{tier_label}")
}

/// Key holding the ranked top times of a tier.
pub fn leaderboard(tier_label: &str) -> String {
    format!("leaderboard_{tier_label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_keys_embed_label_verbatim() {
        assert_eq!(high_score("Medium"), "highscore_Medium");
        assert_eq!(leaderboard("Daily"), "leaderboard_Daily");
    }
}
