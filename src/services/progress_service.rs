//! Read-only views over the persisted aggregates.

use crate::{
    dto::{
        progress::{BadgeDto, BadgesResponse, DailyResponse, LeaderboardResponse, TiersResponse},
        session::TierDto,
    },
    error::ServiceError,
    state::{SharedState, badges::Badge, tier::DAILY_TIER_LABEL},
};

/// Configured tiers.
pub async fn tiers(state: &SharedState) -> TiersResponse {
    let engine = state.engine().await;
    TiersResponse {
        tiers: engine.tiers().iter().cloned().map(TierDto::from).collect(),
        default_tier: state.config().default_tier().label,
    }
}

/// Leaderboard of `label`, which may be a configured tier or the daily tier.
pub async fn leaderboard(
    state: &SharedState,
    label: &str,
) -> Result<LeaderboardResponse, ServiceError> {
    let engine = state.engine().await;
    if label != DAILY_TIER_LABEL && engine.tier(label).is_none() {
        return Err(ServiceError::UnknownTier(label.to_string()));
    }

    let leaderboards = &engine.progress().leaderboards;
    Ok(LeaderboardResponse {
        tier: label.to_string(),
        entries: leaderboards.entries(label).to_vec(),
        high_score: leaderboards.best_time(label),
    })
}

/// Badge catalogue with earned flags.
pub async fn badges(state: &SharedState) -> BadgesResponse {
    let engine = state.engine().await;
    let ledger = &engine.progress().badges;
    BadgesResponse {
        catalogue: Badge::ALL
            .into_iter()
            .map(|badge| BadgeDto {
                id: badge.id().to_string(),
                earned: ledger.has(badge),
            })
            .collect(),
        earned: ledger.earned().map(str::to_string).collect(),
        games_played: ledger.games_played(),
    }
}

/// Today's challenge plus streak state.
pub async fn daily(state: &SharedState) -> DailyResponse {
    let challenge = state.daily_challenge();
    let engine = state.engine().await;
    let streak = &engine.progress().streak;
    let last_completed = streak.last_completed();
    DailyResponse {
        completed_today: last_completed == Some(&challenge.date_key),
        last_completed: last_completed.map(ToString::to_string),
        streak: streak.length(),
        challenge: challenge.into(),
    }
}
