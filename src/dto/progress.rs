use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::session::{DailyChallengeDto, TierDto};

/// Configured tiers, in display order.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TiersResponse {
    /// Selectable tiers.
    pub tiers: Vec<TierDto>,
    /// Tier selected before the player picks one.
    pub default_tier: String,
}

/// Ranked times for one tier.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    /// Tier label.
    pub tier: String,
    /// Up to five times, fastest first.
    pub entries: Vec<f64>,
    /// Personal best.
    pub high_score: Option<f64>,
}

/// Badge catalogue entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct BadgeDto {
    /// Display identifier.
    pub id: String,
    /// Whether the player holds it.
    pub earned: bool,
}

/// Earned badges and play count.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgesResponse {
    /// Every known badge with its earned flag.
    pub catalogue: Vec<BadgeDto>,
    /// Identifiers held, including ones this build does not know.
    pub earned: Vec<String>,
    /// Completed games.
    pub games_played: u32,
}

/// Today's challenge and the streak.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyResponse {
    /// Today's challenge.
    pub challenge: DailyChallengeDto,
    /// Consecutive days completed.
    pub streak: u32,
    /// Date of the last credited completion.
    pub last_completed: Option<String>,
    /// Whether today is already credited.
    pub completed_today: bool,
}
