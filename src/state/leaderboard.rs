use indexmap::IndexMap;

use crate::dao::{keys, models::KvWrite, models::encode_seconds, models::encode_times};

/// Number of times retained per tier.
pub const LEADERBOARD_CAPACITY: usize = 5;

/// Ranked times and personal best of a single tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierRecords {
    entries: Vec<f64>,
    high_score: Option<f64>,
}

/// What a single recorded result changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    /// Zero-based rank of the result, or `None` when it fell off the board.
    pub rank: Option<usize>,
    /// Whether the result replaced the personal best.
    pub new_high_score: bool,
    /// Ranked list after the update.
    pub entries: Vec<f64>,
    /// Personal best after the update.
    pub high_score: Option<f64>,
}

impl TierRecords {
    /// Rebuild records from persisted values, restoring the ordering and size bound.
    pub fn from_parts(mut entries: Vec<f64>, high_score: Option<f64>) -> Self {
        entries.sort_by(f64::total_cmp);
        entries.truncate(LEADERBOARD_CAPACITY);
        Self {
            entries,
            high_score,
        }
    }

    /// Ranked times, fastest first.
    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    /// Historical personal best.
    pub fn high_score(&self) -> Option<f64> {
        self.high_score
    }

    /// Insert `time`, keep the fastest entries and update the personal best.
    pub fn record(&mut self, time: f64) -> RecordOutcome {
        self.entries.push(time);
        self.entries.sort_by(f64::total_cmp);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        // Equal times are distinct entries; the new one ranks after existing ties.
        let rank = self
            .entries
            .iter()
            .rposition(|entry| entry.total_cmp(&time).is_eq());

        let new_high_score = self.high_score.is_none_or(|best| time < best);
        if new_high_score {
            self.high_score = Some(time);
        }

        RecordOutcome {
            rank,
            new_high_score,
            entries: self.entries.clone(),
            high_score: self.high_score,
        }
    }
}

/// Per-tier leaderboards keyed by tier label.
#[derive(Debug, Clone, Default)]
pub struct Leaderboards {
    tiers: IndexMap<String, TierRecords>,
}

impl Leaderboards {
    /// Create an empty set of leaderboards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install hydrated records for `tier_label`.
    pub fn insert(&mut self, tier_label: impl Into<String>, records: TierRecords) {
        self.tiers.insert(tier_label.into(), records);
    }

    /// Records of `tier_label`, if any result was ever recorded or hydrated.
    pub fn get(&self, tier_label: &str) -> Option<&TierRecords> {
        self.tiers.get(tier_label)
    }

    /// Ranked times of `tier_label`, fastest first.
    pub fn entries(&self, tier_label: &str) -> &[f64] {
        self.get(tier_label).map(TierRecords::entries).unwrap_or(&[])
    }

    /// Personal best of `tier_label`.
    pub fn best_time(&self, tier_label: &str) -> Option<f64> {
        self.get(tier_label).and_then(TierRecords::high_score)
    }

    /// Record `time` for `tier_label` and describe the writes that persist it.
    pub fn record_result(&mut self, tier_label: &str, time: f64) -> (RecordOutcome, Vec<KvWrite>) {
        let records = self.tiers.entry(tier_label.to_string()).or_default();
        let outcome = records.record(time);

        let mut writes = Vec::with_capacity(2);
        if outcome.new_high_score {
            writes.push(KvWrite::set(
                keys::high_score(tier_label),
                encode_seconds(time),
            ));
        }
        writes.push(KvWrite::set(
            keys::leaderboard(tier_label),
            encode_times(&outcome.entries),
        ));

        (outcome, writes)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn keeps_five_fastest_in_ascending_order() {
        let mut boards = Leaderboards::new();
        for time in [14.2, 9.8, 20.0, 11.1, 30.5, 8.0, 12.0] {
            boards.record_result("Medium", time);
        }
        assert_eq!(boards.entries("Medium"), &[8.0, 9.8, 11.1, 12.0, 14.2]);
        assert_eq!(boards.best_time("Medium"), Some(8.0));
    }

    #[test]
    fn identical_times_are_not_deduplicated() {
        let mut boards = Leaderboards::new();
        boards.record_result("Easy", 5.0);
        let (outcome, _) = boards.record_result("Easy", 5.0);
        assert_eq!(boards.entries("Easy"), &[5.0, 5.0]);
        assert_eq!(outcome.rank, Some(1));
        assert!(!outcome.new_high_score);
    }

    #[test]
    fn high_score_only_replaced_when_strictly_lower() {
        let mut boards = Leaderboards::new();
        let (first, writes) = boards.record_result("Hard", 20.0);
        assert!(first.new_high_score);
        assert_eq!(
            writes,
            vec![
                KvWrite::set("highscore_Hard", "20.0"),
                KvWrite::set("leaderboard_Hard", "[20.0]"),
            ]
        );

        let (slower, writes) = boards.record_result("Hard", 25.0);
        assert!(!slower.new_high_score);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].key(), "leaderboard_Hard");
        assert_eq!(boards.best_time("Hard"), Some(20.0));
    }

    #[test]
    fn slow_result_falls_off_a_full_board() {
        let mut boards = Leaderboards::new();
        for time in [1.0, 2.0, 3.0, 4.0, 5.0] {
            boards.record_result("Easy", time);
        }
        let (outcome, _) = boards.record_result("Easy", 9.0);
        assert_eq!(outcome.rank, None);
        assert_eq!(boards.entries("Easy").len(), LEADERBOARD_CAPACITY);
    }

    #[test]
    fn tiers_are_isolated() {
        let mut boards = Leaderboards::new();
        boards.record_result("Easy", 3.0);
        boards.record_result("Daily", 7.0);
        assert_eq!(boards.entries("Easy"), &[3.0]);
        assert_eq!(boards.entries("Daily"), &[7.0]);
        assert!(boards.entries("Hard").is_empty());
    }

    #[test]
    fn board_invariants_hold_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut boards = Leaderboards::new();
        let mut submitted = Vec::new();
        for _ in 0..200 {
            let time = f64::from(rng.random_range(10..600_u32)) / 10.0;
            submitted.push(time);
            boards.record_result("Medium", time);

            let entries = boards.entries("Medium");
            assert!(entries.len() <= LEADERBOARD_CAPACITY);
            assert!(entries.windows(2).all(|pair| pair[0] <= pair[1]));
            assert!(entries.iter().all(|entry| submitted.contains(entry)));
        }
    }

    #[test]
    fn hydration_restores_invariants() {
        let records = TierRecords::from_parts(vec![9.0, 1.0, 8.0, 2.0, 7.0, 3.0], Some(1.0));
        assert_eq!(records.entries(), &[1.0, 2.0, 3.0, 7.0, 8.0]);
    }
}
