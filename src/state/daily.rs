//! Calendar-derived daily challenge and the date keys used for streak continuity.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};
use tracing::debug;

const HASH_MODULUS: u32 = 100_000;
const HASH_MULTIPLIER: u32 = 31;
const GOAL_BASE_SECONDS: u32 = 12;
const GOAL_SPREAD: u32 = 9;
const GRID_BASE_SIZE: u32 = 15;
const GRID_SPREAD: u32 = 16;

/// Calendar day rendered as `"{year}-{month}-{day}"` without zero padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Render the key for a calendar date (month is 1-indexed).
    pub fn from_date(date: Date) -> Self {
        Self(format!(
            "{}-{}-{}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }

    /// Wrap a raw string, typically read back from storage.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the textual key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key back into a calendar date, if it is well formed.
    pub fn to_date(&self) -> Option<Date> {
        let mut parts = self.0.splitn(3, '-');
        let year = parts.next()?.trim().parse::<i32>().ok()?;
        let month = parts.next()?.trim().parse::<u8>().ok()?;
        let day = parts.next()?.trim().parse::<u8>().ok()?;
        let month = Month::try_from(month).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Goal and grid size shared by every player on a given calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyChallenge {
    /// Day the challenge belongs to.
    pub date_key: DateKey,
    /// Target completion time, 12..=20 seconds.
    pub goal_seconds: u32,
    /// Number of tiles, 15..=30.
    pub grid_size: u32,
}

impl DailyChallenge {
    /// Derive the challenge for `date_key`. Identical keys always yield identical challenges.
    pub fn for_date(date_key: &DateKey) -> Self {
        let hash = date_hash(date_key.as_str());
        Self {
            date_key: date_key.clone(),
            goal_seconds: GOAL_BASE_SECONDS + hash % GOAL_SPREAD,
            grid_size: GRID_BASE_SIZE + hash % GRID_SPREAD,
        }
    }

    /// Whether `elapsed_secs` beats the goal.
    pub fn is_met_by(&self, elapsed_secs: f64) -> bool {
        elapsed_secs < f64::from(self.goal_seconds)
    }
}

/// Fold UTF-16 code units into `hash * 31 + unit (mod 100000)`.
fn date_hash(key: &str) -> u32 {
    key.encode_utf16().fold(0u32, |hash, unit| {
        (hash * HASH_MULTIPLIER + u32::from(unit)) % HASH_MODULUS
    })
}

/// Source of "today" for daily challenges and streaks.
pub trait DayProvider: Send + Sync {
    /// Current calendar date.
    fn today(&self) -> Date;

    /// Current date key.
    fn today_key(&self) -> DateKey {
        DateKey::from_date(self.today())
    }
}

/// Reads the local calendar date, falling back to UTC when the offset is unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDay;

impl DayProvider for LocalDay {
    fn today(&self) -> Date {
        match OffsetDateTime::now_local() {
            Ok(now) => now.date(),
            Err(err) => {
                debug!(error = %err, "local offset unavailable; using UTC date");
                OffsetDateTime::now_utc().date()
            }
        }
    }
}

/// Pinned date, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedDay(pub Date);

impl DayProvider for FixedDay {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn date_key_is_not_zero_padded() {
        assert_eq!(DateKey::from_date(date!(2024 - 01 - 05)).as_str(), "2024-1-5");
        assert_eq!(DateKey::from_date(date!(2023 - 12 - 31)).as_str(), "2023-12-31");
    }

    #[test]
    fn date_key_round_trips_through_date() {
        let key = DateKey::new("2024-2-29");
        assert_eq!(key.to_date(), Some(date!(2024 - 02 - 29)));
        assert_eq!(DateKey::new("2023-2-29").to_date(), None);
        assert_eq!(DateKey::new("garbage").to_date(), None);
    }

    #[test]
    fn hash_matches_reference_fold() {
        // "1" = 49, then 49*31 + 45 ('-') = 1564
        assert_eq!(date_hash("1"), 49);
        assert_eq!(date_hash("1-"), 1564);
        assert_eq!(date_hash(""), 0);
    }

    #[test]
    fn challenge_is_deterministic_and_in_range() {
        let samples = [
            "2024-1-1",
            "2024-1-12",
            "2024-12-1",
            "2024-12-31",
            "1999-9-9",
            "2025-6-15",
            "2030-10-10",
            "2000-2-29",
            "2026-10-18",
            "12345-11-30",
        ];
        for raw in samples {
            let key = DateKey::new(raw);
            let first = DailyChallenge::for_date(&key);
            let second = DailyChallenge::for_date(&key);
            assert_eq!(first, second);
            assert!((12..=20).contains(&first.goal_seconds), "{raw}");
            assert!((15..=30).contains(&first.grid_size), "{raw}");
        }
    }

    #[test]
    fn goal_is_strictly_below() {
        let challenge = DailyChallenge {
            date_key: DateKey::new("2024-1-1"),
            goal_seconds: 15,
            grid_size: 20,
        };
        assert!(challenge.is_met_by(14.9));
        assert!(!challenge.is_met_by(15.0));
    }

    #[test]
    fn fixed_day_provides_key() {
        let day = FixedDay(date!(2024 - 03 - 07));
        assert_eq!(day.today_key(), DateKey::new("2024-3-7"));
    }
}
