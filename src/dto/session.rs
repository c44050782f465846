//! Wire types for the session endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::state::{
    daily::DailyChallenge,
    engine::{EngineSnapshot, TapOutcome},
    state_machine::{Outcome, SessionPhase},
    tier::DifficultyTier,
};

/// Coarse session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session.
    Idle,
    /// Countdown on display.
    CountingDown,
    /// Player is tapping.
    Active,
    /// Won or aborted; see `outcome`.
    Finished,
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every tile tapped in order.
    Won,
    /// Stopped by the player.
    Aborted,
}

impl From<Outcome> for SessionOutcome {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Won => SessionOutcome::Won,
            Outcome::Aborted => SessionOutcome::Aborted,
        }
    }
}

impl From<SessionPhase> for SessionStatus {
    fn from(value: SessionPhase) -> Self {
        match value {
            SessionPhase::Idle => SessionStatus::Idle,
            SessionPhase::CountingDown(_) => SessionStatus::CountingDown,
            SessionPhase::Active => SessionStatus::Active,
            SessionPhase::Finished(_) => SessionStatus::Finished,
        }
    }
}

/// A difficulty tier.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TierDto {
    /// Display label.
    pub label: String,
    /// Number of tiles.
    pub size: u32,
}

impl From<DifficultyTier> for TierDto {
    fn from(value: DifficultyTier) -> Self {
        Self {
            label: value.label,
            size: value.size,
        }
    }
}

/// Challenge derived from a calendar date.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallengeDto {
    /// Date key, `Y-M-D` without zero padding.
    pub date_key: String,
    /// Target time in seconds.
    pub goal_seconds: u32,
    /// Number of tiles.
    pub grid_size: u32,
}

impl From<DailyChallenge> for DailyChallengeDto {
    fn from(value: DailyChallenge) -> Self {
        Self {
            date_key: value.date_key.to_string(),
            goal_seconds: value.goal_seconds,
            grid_size: value.grid_size,
        }
    }
}

/// Everything the presentation layer needs to render the game.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    /// Coarse status.
    pub status: SessionStatus,
    /// Countdown value while counting down.
    pub countdown: Option<u8>,
    /// Current or last session.
    pub session_id: Option<Uuid>,
    /// Elapsed seconds; null when idle or aborted.
    pub elapsed: Option<f64>,
    /// Next value to tap.
    pub next_expected: u32,
    /// Tile layout.
    pub sequence: Vec<u32>,
    /// Tier being shown.
    pub tier: TierDto,
    /// Whether the session is the daily challenge.
    pub is_daily: bool,
    /// Ranked times of `tier`, fastest first.
    pub leaderboard: Vec<f64>,
    /// Personal best of `tier`.
    pub high_score: Option<f64>,
    /// Earned badge identifiers.
    pub badges: Vec<String>,
    /// Completed games.
    pub games_played: u32,
    /// Daily streak length.
    pub streak: u32,
    /// Today's daily challenge.
    pub daily_challenge: DailyChallengeDto,
    /// Outcome once finished.
    pub outcome: Option<SessionOutcome>,
}

impl From<EngineSnapshot> for SnapshotDto {
    fn from(value: EngineSnapshot) -> Self {
        Self {
            status: value.phase.into(),
            countdown: value.countdown(),
            outcome: value.outcome().map(Into::into),
            session_id: value.session_id,
            elapsed: value.elapsed,
            next_expected: value.next_expected,
            sequence: value.sequence,
            tier: value.tier.into(),
            is_daily: value.is_daily,
            leaderboard: value.leaderboard,
            high_score: value.high_score,
            badges: value.badges,
            games_played: value.games_played,
            streak: value.streak,
            daily_challenge: value.daily_challenge.into(),
        }
    }
}

/// Request to start a session on a configured tier.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartSessionRequest {
    /// Tier label.
    #[validate(length(min = 1, max = 64))]
    pub tier: String,
}

/// A tile tap.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TapRequest {
    /// Tapped tile value.
    #[validate(range(min = 1))]
    pub value: u32,
}

/// Classification of a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TapResult {
    /// No active session.
    Ignored,
    /// Out of order.
    Wrong,
    /// In order.
    Correct,
    /// Final tile.
    Won,
}

impl From<&TapOutcome> for TapResult {
    fn from(value: &TapOutcome) -> Self {
        match value {
            TapOutcome::Ignored => TapResult::Ignored,
            TapOutcome::Wrong { .. } => TapResult::Wrong,
            TapOutcome::Correct { .. } => TapResult::Correct,
            TapOutcome::Won(_) => TapResult::Won,
        }
    }
}

/// Result of a tap plus the state after it.
#[derive(Debug, Serialize, ToSchema)]
pub struct TapResponse {
    /// Classification.
    pub result: TapResult,
    /// Game state after the tap.
    pub snapshot: SnapshotDto,
}

/// Summary of the last finished session.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSummaryDto {
    /// Session summarised.
    pub session_id: Uuid,
    /// Player nickname.
    pub nickname: String,
    /// Tier label.
    pub tier: String,
    /// Completion time; null when aborted.
    pub time: Option<f64>,
    /// How the session ended.
    pub outcome: SessionOutcome,
    /// Whether it was the daily challenge.
    pub is_daily: bool,
    /// Daily goal in seconds.
    pub daily_goal: Option<u32>,
    /// Whether the daily goal was beaten.
    pub daily_goal_met: Option<bool>,
    /// Whether the time set a new personal best.
    pub is_high_score: bool,
    /// Zero-based leaderboard position.
    pub rank: Option<usize>,
    /// Badges unlocked by this session.
    pub unlocked_badges: Vec<String>,
    /// Streak after this session, when credited.
    pub streak: Option<u32>,
    /// Something to read while resting.
    pub fun_fact: Option<String>,
    /// Text for sharing the result.
    pub share_text: String,
}
