use crate::{
    dao::{
        keys,
        models::{KvWrite, encode_count},
    },
    state::daily::DateKey,
};

/// Consecutive-day daily challenge completions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakState {
    last_completed: Option<DateKey>,
    length: u32,
}

impl StreakState {
    /// Rebuild a streak from persisted values.
    pub fn from_parts(last_completed: Option<DateKey>, length: u32) -> Self {
        Self {
            last_completed,
            length,
        }
    }

    /// Date of the last credited completion.
    pub fn last_completed(&self) -> Option<&DateKey> {
        self.last_completed.as_ref()
    }

    /// Current streak length.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Credit a daily completion on `today`.
    ///
    /// Returns `None` when `today` was already credited. Otherwise the streak
    /// grows by one if the previous completion was exactly one calendar day
    /// earlier and restarts at one in every other case, including unparsable
    /// or future-dated previous keys.
    pub fn record_daily_completion(&mut self, today: &DateKey) -> Option<Vec<KvWrite>> {
        if self.last_completed.as_ref() == Some(today) {
            return None;
        }

        self.length = match &self.last_completed {
            None => 1,
            Some(last) if days_between(last, today) == Some(1) => self.length.saturating_add(1),
            Some(_) => 1,
        };
        self.last_completed = Some(today.clone());

        Some(vec![
            KvWrite::set(keys::LAST_DAILY_DATE, today.as_str()),
            KvWrite::set(keys::DAILY_STREAK, encode_count(self.length)),
        ])
    }
}

fn days_between(from: &DateKey, to: &DateKey) -> Option<i64> {
    Some((to.to_date()? - from.to_date()?).whole_days())
}
