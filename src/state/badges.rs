use indexmap::IndexSet;

use crate::dao::{
    keys,
    models::{KvWrite, encode_count, encode_identifiers},
};

/// Completion time below which [`Badge::Under10Seconds`] unlocks.
pub const FAST_FINISH_SECONDS: f64 = 10.0;
/// Games-played count at which [`Badge::FivePlayed`] unlocks.
pub const VETERAN_GAMES: u32 = 5;

/// Built-in achievements, evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    /// First completed game.
    FirstWin,
    /// A game finished in under ten seconds.
    Under10Seconds,
    /// Five games completed.
    FivePlayed,
}

impl Badge {
    /// Every built-in badge in evaluation order.
    pub const ALL: [Badge; 3] = [Badge::FirstWin, Badge::Under10Seconds, Badge::FivePlayed];

    /// Identifier stored in the badge ledger.
    pub fn id(self) -> &'static str {
        match self {
            Badge::FirstWin => "First Win",
            Badge::Under10Seconds => "Under 10 Seconds",
            Badge::FivePlayed => "5 Games Played",
        }
    }

    /// Resolve a stored identifier back into a built-in badge.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|badge| badge.id() == id)
    }

    fn qualifies(self, time: f64, games_played: u32) -> bool {
        match self {
            Badge::FirstWin => true,
            Badge::Under10Seconds => time < FAST_FINISH_SECONDS,
            Badge::FivePlayed => games_played >= VETERAN_GAMES,
        }
    }
}

/// Result of evaluating badges after a completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeEvaluation {
    /// Badges unlocked by this evaluation, in precedence order.
    pub unlocked: Vec<Badge>,
    /// Games-played counter after this evaluation.
    pub games_played: u32,
}

/// Monotonic set of earned badge identifiers plus the games-played counter.
///
/// Identifiers are kept as strings so that entries this build does not know
/// about survive a load/save cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeLedger {
    earned: IndexSet<String>,
    games_played: u32,
}

impl BadgeLedger {
    /// Rebuild a ledger from persisted values.
    pub fn from_parts(earned: impl IntoIterator<Item = String>, games_played: u32) -> Self {
        Self {
            earned: earned.into_iter().collect(),
            games_played,
        }
    }

    /// Earned identifiers in unlock order.
    pub fn earned(&self) -> impl Iterator<Item = &str> {
        self.earned.iter().map(String::as_str)
    }

    /// Whether `badge` has been earned.
    pub fn has(&self, badge: Badge) -> bool {
        self.earned.contains(badge.id())
    }

    /// Number of completed games.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Count a completed game finished in `time` seconds and unlock every badge
    /// that now qualifies. Badge set and counter are always written together.
    pub fn evaluate(&mut self, time: f64) -> (BadgeEvaluation, Vec<KvWrite>) {
        self.games_played = self.games_played.saturating_add(1);

        let mut unlocked = Vec::new();
        for badge in Badge::ALL {
            if !self.has(badge) && badge.qualifies(time, self.games_played) {
                self.earned.insert(badge.id().to_string());
                unlocked.push(badge);
            }
        }

        let writes = vec![
            KvWrite::set(keys::BADGES, encode_identifiers(self.earned())),
            KvWrite::set(keys::GAMES_PLAYED, encode_count(self.games_played)),
        ];

        (
            BadgeEvaluation {
                unlocked,
                games_played: self.games_played,
            },
            writes,
        )
    }
}
