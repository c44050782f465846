//! The game progression engine: one session at a time plus the persisted
//! aggregates it feeds (leaderboards, badges, daily streak).
//!
//! Everything here is synchronous. Timers and storage live in the service
//! layer, which feeds ticks in and flushes the [`KvWrite`]s handed back.

use rand::Rng;
use tracing::debug;

use crate::{
    dao::models::KvWrite,
    state::{
        badges::{BadgeEvaluation, BadgeLedger},
        clock::Clock,
        daily::{DailyChallenge, DateKey},
        leaderboard::{Leaderboards, RecordOutcome},
        sequence,
        session::{GameResult, SessionId, SessionState},
        state_machine::{InvalidTransition, Outcome, SessionEvent, SessionPhase, SessionStateMachine},
        streak::StreakState,
        tier::DifficultyTier,
    },
};

/// Persisted aggregates, hydrated at startup.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    /// Per-tier ranked times and personal bests.
    pub leaderboards: Leaderboards,
    /// Earned badges and games played.
    pub badges: BadgeLedger,
    /// Daily challenge streak.
    pub streak: StreakState,
}

/// Step reported by [`GameEngine::advance_countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Countdown continues with this value on display.
    Remaining(u8),
    /// Countdown completed; the session is now active.
    Started,
}

/// Everything a winning tap changed.
#[derive(Debug, Clone, PartialEq)]
pub struct WinReport {
    /// Summary of the finished session.
    pub result: GameResult,
    /// Leaderboard update for the session tier.
    pub leaderboard: RecordOutcome,
    /// Badge evaluation triggered by the win.
    pub badges: BadgeEvaluation,
    /// Streak length after crediting, for daily sessions credited today.
    pub streak: Option<u32>,
    /// Storage writes, in leaderboard, badge, streak order.
    pub writes: Vec<KvWrite>,
}

/// How a submitted tap was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    /// No session is active; nothing changed.
    Ignored,
    /// Out-of-order tap; nothing changed.
    Wrong {
        /// Tapped value.
        value: u32,
        /// Value that was expected.
        expected: u32,
    },
    /// In-order tap that did not finish the grid.
    Correct {
        /// Tapped value.
        value: u32,
        /// Value expected next.
        next_expected: u32,
    },
    /// The final tile was tapped; the session is won.
    Won(Box<WinReport>),
}

/// Read-only view of the engine after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    /// Current phase.
    pub phase: SessionPhase,
    /// State machine version, bumped on every transition.
    pub version: usize,
    /// Current or last session id.
    pub session_id: Option<SessionId>,
    /// Tier of the current session, or the selected tier when idle.
    pub tier: DifficultyTier,
    /// Whether the current session is the daily challenge.
    pub is_daily: bool,
    /// Tile layout.
    pub sequence: Vec<u32>,
    /// Next value to tap.
    pub next_expected: u32,
    /// Elapsed seconds; `None` when idle or after an abort.
    pub elapsed: Option<f64>,
    /// Ranked times of `tier`.
    pub leaderboard: Vec<f64>,
    /// Personal best of `tier`.
    pub high_score: Option<f64>,
    /// Earned badge identifiers.
    pub badges: Vec<String>,
    /// Games completed.
    pub games_played: u32,
    /// Daily streak length.
    pub streak: u32,
    /// Date of the last credited daily challenge.
    pub last_daily: Option<DateKey>,
    /// Today's daily challenge.
    pub daily_challenge: DailyChallenge,
}

impl EngineSnapshot {
    /// Outcome of the finished session, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            SessionPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Countdown value on display, if counting down.
    pub fn countdown(&self) -> Option<u8> {
        match self.phase {
            SessionPhase::CountingDown(remaining) => Some(remaining),
            _ => None,
        }
    }
}

/// Owner of the single live session and the progression aggregates.
#[derive(Debug, Clone)]
pub struct GameEngine {
    tiers: Vec<DifficultyTier>,
    selected: DifficultyTier,
    machine: SessionStateMachine,
    session: Option<SessionState>,
    clock: Clock,
    progress: Progress,
    last_result: Option<GameResult>,
}

impl GameEngine {
    /// Build an idle engine over the configured `tiers`, with `selected` shown while idle.
    pub fn new(tiers: Vec<DifficultyTier>, selected: DifficultyTier, progress: Progress) -> Self {
        Self {
            tiers,
            selected,
            machine: SessionStateMachine::new(),
            session: None,
            clock: Clock::default(),
            progress,
            last_result: None,
        }
    }

    /// Configured tiers, excluding the daily tier.
    pub fn tiers(&self) -> &[DifficultyTier] {
        &self.tiers
    }

    /// Look up a configured tier by label.
    pub fn tier(&self, label: &str) -> Option<&DifficultyTier> {
        self.tiers.iter().find(|tier| tier.label == label)
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Current or last session.
    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Persisted aggregates.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Summary of the last finished session, cleared on the next start.
    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    /// Whether `id` is the live session.
    pub fn is_current(&self, id: SessionId) -> bool {
        self.session.as_ref().is_some_and(|session| session.id == id)
    }

    /// Begin a countdown for `tier`. Accepted only while idle or finished; every
    /// per-session field is reinitialised.
    pub fn request_start(
        &mut self,
        tier: DifficultyTier,
        daily: Option<DailyChallenge>,
    ) -> Result<SessionId, InvalidTransition> {
        self.machine.apply(SessionEvent::Start)?;
        self.clock.reset();
        self.last_result = None;
        if daily.is_none() {
            self.selected = tier.clone();
        }

        let session = SessionState::new(tier, daily);
        let id = session.id;
        debug!(session_id = %id, tier = %session.tier.label, daily = session.is_daily(), "session requested");
        self.session = Some(session);
        Ok(id)
    }

    /// Apply one countdown second for session `id`. On the last step the tiles
    /// are shuffled and the clock restarted from zero.
    ///
    /// Returns `None` when `id` is stale or the session is not counting down.
    pub fn advance_countdown<R>(&mut self, id: SessionId, rng: &mut R) -> Option<CountdownStep>
    where
        R: Rng + ?Sized,
    {
        if !self.is_current(id) || !matches!(self.phase(), SessionPhase::CountingDown(_)) {
            return None;
        }

        match self.machine.apply(SessionEvent::CountdownTick).ok()? {
            SessionPhase::CountingDown(remaining) => Some(CountdownStep::Remaining(remaining)),
            SessionPhase::Active => {
                let session = self.session.as_mut()?;
                session.sequence = sequence::generate(session.tier.size, rng);
                session.next_expected = 1;
                session.final_time = None;
                self.clock.reset();
                self.clock.start();
                Some(CountdownStep::Started)
            }
            _ => None,
        }
    }

    /// Advance the session clock by one period for session `id`, returning the
    /// elapsed seconds, or `None` when the tick no longer applies.
    pub fn tick(&mut self, id: SessionId) -> Option<f64> {
        if !self.is_current(id) || self.phase() != SessionPhase::Active {
            return None;
        }
        self.clock.advance().map(|elapsed| elapsed.as_secs_f64())
    }

    /// Handle a tile tap.
    pub fn submit_tap(&mut self, value: u32) -> TapOutcome {
        if self.phase() != SessionPhase::Active {
            return TapOutcome::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return TapOutcome::Ignored;
        };

        let expected = session.next_expected;
        if value != expected {
            return TapOutcome::Wrong { value, expected };
        }

        session.next_expected += 1;
        if !session.is_final_value(value) {
            return TapOutcome::Correct {
                value,
                next_expected: session.next_expected,
            };
        }

        match self.finish_won() {
            Some(report) => TapOutcome::Won(Box::new(report)),
            None => TapOutcome::Ignored,
        }
    }

    fn finish_won(&mut self) -> Option<WinReport> {
        self.clock.stop();
        let time = self.clock.elapsed_secs();
        self.machine.apply(SessionEvent::Win).ok()?;

        let session = self.session.as_mut()?;
        session.final_time = Some(time);
        let tier_label = session.tier.label.clone();
        let daily = session.daily.clone();
        let session_id = session.id;

        let (leaderboard, mut writes) = self
            .progress
            .leaderboards
            .record_result(&tier_label, time);

        let (badges, badge_writes) = self.progress.badges.evaluate(time);
        writes.extend(badge_writes);

        let mut streak = None;
        if let Some(challenge) = &daily {
            if let Some(streak_writes) = self
                .progress
                .streak
                .record_daily_completion(&challenge.date_key)
            {
                streak = Some(self.progress.streak.length());
                writes.extend(streak_writes);
            }
        }

        let result = GameResult {
            session_id,
            tier_label,
            time: Some(time),
            daily,
            new_high_score: leaderboard.new_high_score,
            rank: leaderboard.rank,
            unlocked: badges.unlocked.clone(),
            streak,
        };
        self.last_result = Some(result.clone());

        Some(WinReport {
            result,
            leaderboard,
            badges,
            streak,
            writes,
        })
    }

    /// Stop the active session. The tiles, progress and elapsed time are
    /// discarded and no progression is recorded.
    pub fn request_stop(&mut self) -> Result<GameResult, InvalidTransition> {
        self.machine.apply(SessionEvent::Stop)?;
        self.clock.reset();

        let result = match self.session.as_mut() {
            Some(session) => {
                session.sequence.clear();
                session.next_expected = 1;
                session.final_time = None;
                GameResult::aborted(session)
            }
            None => GameResult::aborted(&SessionState::new(self.selected.clone(), None)),
        };
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Close the summary of a finished session and return to idle.
    pub fn dismiss(&mut self) -> Result<(), InvalidTransition> {
        self.machine.apply(SessionEvent::Dismiss)?;
        self.clock.reset();
        self.session = None;
        Ok(())
    }

    /// Elapsed seconds as shown to the player.
    pub fn elapsed(&self) -> Option<f64> {
        match self.phase() {
            SessionPhase::Idle | SessionPhase::Finished(Outcome::Aborted) => None,
            SessionPhase::CountingDown(_) => Some(0.0),
            SessionPhase::Active => Some(self.clock.elapsed_secs()),
            SessionPhase::Finished(Outcome::Won) => self
                .session
                .as_ref()
                .and_then(|session| session.final_time),
        }
    }

    /// Capture everything the presentation layer needs to render.
    pub fn snapshot(&self, daily_challenge: DailyChallenge) -> EngineSnapshot {
        let tier = self
            .session
            .as_ref()
            .map(|session| session.tier.clone())
            .unwrap_or_else(|| self.selected.clone());
        let (sequence, next_expected, is_daily, session_id) = match &self.session {
            Some(session) => (
                session.sequence.clone(),
                session.next_expected,
                session.is_daily(),
                Some(session.id),
            ),
            None => (Vec::new(), 1, false, None),
        };

        EngineSnapshot {
            phase: self.phase(),
            version: self.machine.version(),
            session_id,
            is_daily,
            sequence,
            next_expected,
            elapsed: self.elapsed(),
            leaderboard: self.progress.leaderboards.entries(&tier.label).to_vec(),
            high_score: self.progress.leaderboards.best_time(&tier.label),
            badges: self.progress.badges.earned().map(str::to_string).collect(),
            games_played: self.progress.badges.games_played(),
            streak: self.progress.streak.length(),
            last_daily: self.progress.streak.last_completed().cloned(),
            daily_challenge,
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::state::{
        badges::Badge,
        tier::{DAILY_TIER_LABEL, default_tiers},
    };

    fn engine() -> GameEngine {
        GameEngine::new(
            default_tiers(),
            DifficultyTier::new("Medium", 20),
            Progress::default(),
        )
    }

    fn challenge() -> DailyChallenge {
        DailyChallenge::for_date(&DateKey::new("2024-1-2"))
    }

    fn start_active(engine: &mut GameEngine, tier: DifficultyTier) -> SessionId {
        let id = engine.request_start(tier, None).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            engine.advance_countdown(id, &mut rng),
            Some(CountdownStep::Remaining(2))
        );
        assert_eq!(
            engine.advance_countdown(id, &mut rng),
            Some(CountdownStep::Remaining(1))
        );
        assert_eq!(
            engine.advance_countdown(id, &mut rng),
            Some(CountdownStep::Started)
        );
        id
    }

    fn run_ticks(engine: &mut GameEngine, id: SessionId, count: usize) {
        for _ in 0..count {
            engine.tick(id);
        }
    }

    #[test]
    fn start_does_not_allocate_tiles_until_countdown_ends() {
        let mut engine = engine();
        engine
            .request_start(DifficultyTier::new("Easy", 10), None)
            .unwrap();
        let snapshot = engine.snapshot(challenge());
        assert_eq!(snapshot.phase, SessionPhase::CountingDown(3));
        assert_eq!(snapshot.countdown(), Some(3));
        assert!(snapshot.sequence.is_empty());
        assert_eq!(snapshot.elapsed, Some(0.0));
    }

    #[test]
    fn countdown_completion_shuffles_and_starts_clock() {
        let mut engine = engine();
        let id = start_active(&mut engine, DifficultyTier::new("Easy", 10));
        let snapshot = engine.snapshot(challenge());
        assert_eq!(snapshot.phase, SessionPhase::Active);
        let mut tiles = snapshot.sequence.clone();
        tiles.sort_unstable();
        assert_eq!(tiles, (1..=10).collect::<Vec<_>>());
        assert_eq!(engine.tick(id), Some(0.1));
    }

    #[test]
    fn winning_in_order_records_everything() {
        let mut engine = engine();
        let id = start_active(&mut engine, DifficultyTier::new("Easy", 10));
        run_ticks(&mut engine, id, 52);

        for value in 1..=9 {
            assert!(matches!(
                engine.submit_tap(value),
                TapOutcome::Correct { .. }
            ));
        }
        let TapOutcome::Won(report) = engine.submit_tap(10) else {
            panic!("expected a win");
        };

        assert_eq!(report.result.time, Some(5.2));
        assert!(report.result.new_high_score);
        assert_eq!(report.badges.unlocked, vec![Badge::FirstWin, Badge::Under10Seconds]);
        assert_eq!(report.streak, None);
        let keys: Vec<_> = report.writes.iter().map(KvWrite::key).collect();
        assert_eq!(
            keys,
            vec!["highscore_Easy", "leaderboard_Easy", "badges", "gamesPlayed"]
        );

        let snapshot = engine.snapshot(challenge());
        assert_eq!(snapshot.outcome(), Some(Outcome::Won));
        assert_eq!(snapshot.leaderboard, vec![5.2]);
        assert_eq!(snapshot.high_score, Some(5.2));
        assert_eq!(snapshot.games_played, 1);
        assert_eq!(snapshot.next_expected, 11);
        assert_eq!(snapshot.elapsed, Some(5.2));
        assert!(snapshot.badges.contains(&"First Win".to_string()));

        assert_eq!(engine.tick(id), None);
        assert_eq!(engine.elapsed(), Some(5.2));
    }

    #[test]
    fn wrong_tap_changes_nothing() {
        let mut engine = engine();
        start_active(&mut engine, DifficultyTier::new("Easy", 10));
        let before = engine.snapshot(challenge());
        assert_eq!(
            engine.submit_tap(5),
            TapOutcome::Wrong {
                value: 5,
                expected: 1
            }
        );
        assert_eq!(engine.snapshot(challenge()), before);
    }

    #[test]
    fn repeated_tap_is_treated_as_wrong() {
        let mut engine = engine();
        start_active(&mut engine, DifficultyTier::new("Easy", 10));
        engine.submit_tap(1);
        assert_eq!(
            engine.submit_tap(1),
            TapOutcome::Wrong {
                value: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn single_tile_wins_on_first_tap() {
        let mut engine = engine();
        start_active(&mut engine, DifficultyTier::new("Solo", 1));
        assert!(matches!(engine.submit_tap(1), TapOutcome::Won(_)));
    }

    #[test]
    fn taps_outside_active_are_ignored() {
        let mut engine = engine();
        assert_eq!(engine.submit_tap(1), TapOutcome::Ignored);
        engine
            .request_start(DifficultyTier::new("Easy", 10), None)
            .unwrap();
        assert_eq!(engine.submit_tap(1), TapOutcome::Ignored);
    }

    #[test]
    fn stop_discards_progress_without_recording() {
        let mut engine = engine();
        let id = start_active(&mut engine, DifficultyTier::new("Easy", 10));
        run_ticks(&mut engine, id, 30);
        engine.submit_tap(1);

        let result = engine.request_stop().unwrap();
        assert!(result.is_aborted());

        let snapshot = engine.snapshot(challenge());
        assert_eq!(snapshot.outcome(), Some(Outcome::Aborted));
        assert_eq!(snapshot.elapsed, None);
        assert!(snapshot.sequence.is_empty());
        assert_eq!(snapshot.next_expected, 1);
        assert!(snapshot.leaderboard.is_empty());
        assert_eq!(snapshot.games_played, 0);
        assert!(snapshot.badges.is_empty());
        assert_eq!(engine.tick(id), None);
    }

    #[test]
    fn stop_outside_active_is_rejected() {
        let mut engine = engine();
        assert!(engine.request_stop().is_err());
        engine
            .request_start(DifficultyTier::new("Easy", 10), None)
            .unwrap();
        assert!(engine.request_stop().is_err());
    }

    #[test]
    fn start_rejected_while_running() {
        let mut engine = engine();
        start_active(&mut engine, DifficultyTier::new("Easy", 10));
        assert!(
            engine
                .request_start(DifficultyTier::new("Hard", 30), None)
                .is_err()
        );
        assert_eq!(engine.session().unwrap().tier.label, "Easy");
    }

    #[test]
    fn restart_from_finished_resets_session_fields() {
        let mut engine = engine();
        let first = start_active(&mut engine, DifficultyTier::new("Solo", 1));
        engine.submit_tap(1);
        assert!(engine.last_result().is_some());

        let second = engine
            .request_start(DifficultyTier::new("Easy", 10), None)
            .unwrap();
        assert_ne!(first, second);
        assert!(engine.last_result().is_none());
        let session = engine.session().unwrap();
        assert!(session.sequence.is_empty());
        assert_eq!(session.next_expected, 1);
        assert_eq!(session.final_time, None);

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(engine.advance_countdown(first, &mut rng), None);
    }

    #[test]
    fn daily_win_credits_streak_once() {
        let mut engine = engine();
        let daily = challenge();
        for _ in 0..2 {
            let id = engine
                .request_start(DifficultyTier::daily(1), Some(daily.clone()))
                .unwrap();
            let mut rng = StdRng::seed_from_u64(2);
            for _ in 0..3 {
                engine.advance_countdown(id, &mut rng);
            }
            engine.submit_tap(1);
        }

        assert_eq!(engine.progress().streak.length(), 1);
        assert_eq!(
            engine.progress().leaderboards.entries(DAILY_TIER_LABEL).len(),
            2
        );
        assert_eq!(engine.progress().badges.games_played(), 2);
    }

    #[test]
    fn daily_win_orders_streak_writes_last() {
        let mut engine = engine();
        let id = engine
            .request_start(DifficultyTier::daily(1), Some(challenge()))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..3 {
            engine.advance_countdown(id, &mut rng);
        }
        let TapOutcome::Won(report) = engine.submit_tap(1) else {
            panic!("expected a win");
        };
        assert_eq!(report.streak, Some(1));
        let keys: Vec<_> = report.writes.iter().map(KvWrite::key).collect();
        assert_eq!(
            keys,
            vec![
                "highscore_Daily",
                "leaderboard_Daily",
                "badges",
                "gamesPlayed",
                "lastDailyDate",
                "dailyStreak"
            ]
        );
        assert_eq!(report.result.daily_goal_met(), Some(true));
    }

    #[test]
    fn dismiss_returns_to_idle_with_selected_tier() {
        let mut engine = engine();
        start_active(&mut engine, DifficultyTier::new("Hard", 30));
        engine.request_stop().unwrap();
        engine.dismiss().unwrap();

        let snapshot = engine.snapshot(challenge());
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert_eq!(snapshot.tier.label, "Hard");
        assert_eq!(snapshot.session_id, None);
        assert!(engine.dismiss().is_err());
    }

    #[test]
    fn tier_lookup() {
        let engine = engine();
        assert_eq!(engine.tier("Hard").map(|tier| tier.size), Some(30));
        assert!(engine.tier(DAILY_TIER_LABEL).is_none());
    }
}
