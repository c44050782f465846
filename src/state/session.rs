use uuid::Uuid;

use crate::state::{badges::Badge, daily::DailyChallenge, tier::DifficultyTier};

/// Identifier of one play-through, used to discard callbacks from earlier sessions.
pub type SessionId = Uuid;

/// Per-session data; replaced wholesale on every start request.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Identifier of this play-through.
    pub id: SessionId,
    /// Tier being played.
    pub tier: DifficultyTier,
    /// Daily challenge this session was started for, if any.
    pub daily: Option<DailyChallenge>,
    /// Shuffled tile values; empty until the countdown completes and after an abort.
    pub sequence: Vec<u32>,
    /// Next value the player must tap, `1..=size + 1`.
    pub next_expected: u32,
    /// Completion time, frozen when the session is won.
    pub final_time: Option<f64>,
}

impl SessionState {
    /// Fresh session for `tier`; the sequence is generated later.
    pub fn new(tier: DifficultyTier, daily: Option<DailyChallenge>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tier,
            daily,
            sequence: Vec::new(),
            next_expected: 1,
            final_time: None,
        }
    }

    /// Whether this session plays the daily challenge.
    pub fn is_daily(&self) -> bool {
        self.daily.is_some()
    }

    /// Whether `value` is the last tile of the grid.
    pub fn is_final_value(&self, value: u32) -> bool {
        value == self.tier.size
    }
}

/// Summary of a finished session, kept until the next start.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    /// Session the result belongs to.
    pub session_id: SessionId,
    /// Tier label the session was played on.
    pub tier_label: String,
    /// Completion time; `None` when the session was aborted.
    pub time: Option<f64>,
    /// Daily challenge played, if any.
    pub daily: Option<DailyChallenge>,
    /// Whether the result set a new personal best.
    pub new_high_score: bool,
    /// Zero-based leaderboard position of the result.
    pub rank: Option<usize>,
    /// Badges unlocked by this result.
    pub unlocked: Vec<Badge>,
    /// Streak length after this result, when it credited a daily completion.
    pub streak: Option<u32>,
}

impl GameResult {
    /// Result of a stopped session: no time, no progression.
    pub fn aborted(session: &SessionState) -> Self {
        Self {
            session_id: session.id,
            tier_label: session.tier.label.clone(),
            time: None,
            daily: session.daily.clone(),
            new_high_score: false,
            rank: None,
            unlocked: Vec::new(),
            streak: None,
        }
    }

    /// Whether the session was stopped before completion.
    pub fn is_aborted(&self) -> bool {
        self.time.is_none()
    }

    /// Whether the daily goal was beaten; `None` outside daily sessions.
    pub fn daily_goal_met(&self) -> Option<bool> {
        let daily = self.daily.as_ref()?;
        Some(self.time.is_some_and(|time| daily.is_met_by(time)))
    }

    /// One-line text suitable for handing to a share sheet or clipboard.
    pub fn share_text(&self) -> String {
        let time = self
            .time
            .map(|time| format!("{time:.1}"))
            .unwrap_or_else(|| "--".to_string());
        let suffix = if self.daily.is_some() {
            " (Daily Challenge)"
        } else {
            ""
        };
        format!(
            "I played Number Click Challenge! Difficulty: {}, Time: {}s{}",
            self.tier_label, time, suffix
        )
    }
}
