//! Bridges the synchronous engine and the key-value store: hydration at
//! startup and an ordered, fire-and-forget writer afterwards.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::{
    dao::{
        keys,
        kv_store::KeyValueStore,
        models::{
            DecodeError, KvWrite, decode_count, decode_flag, decode_identifiers, decode_seconds,
            decode_times,
        },
    },
    state::{
        badges::BadgeLedger,
        daily::DateKey,
        engine::Progress,
        leaderboard::TierRecords,
        preferences::{ColorScheme, Preferences, normalize_nickname},
        streak::StreakState,
        tier::DAILY_TIER_LABEL,
    },
};

/// State read back from the store at startup.
#[derive(Debug, Default)]
pub struct Hydrated {
    /// Leaderboards, badges and streak.
    pub progress: Progress,
    /// Presentation preferences.
    pub preferences: Preferences,
    /// Removals for keys whose values did not parse.
    pub resets: Vec<KvWrite>,
}

/// Read every engine-owned key. Unreachable storage yields defaults; malformed
/// values yield defaults and a queued removal of the offending key.
pub async fn hydrate<'a>(
    store: &dyn KeyValueStore,
    tier_labels: impl IntoIterator<Item = &'a str>,
) -> Hydrated {
    let mut resets = Vec::new();
    let mut progress = Progress::default();

    let labels = tier_labels
        .into_iter()
        .chain(std::iter::once(DAILY_TIER_LABEL));
    for label in labels {
        let high_score = read(store, &keys::high_score(label), decode_seconds, &mut resets).await;
        let entries = read(store, &keys::leaderboard(label), decode_times, &mut resets)
            .await
            .unwrap_or_default();
        if high_score.is_some() || !entries.is_empty() {
            progress
                .leaderboards
                .insert(label, TierRecords::from_parts(entries, high_score));
        }
    }

    let earned = read(store, keys::BADGES, decode_identifiers, &mut resets)
        .await
        .unwrap_or_default();
    let games_played = read(store, keys::GAMES_PLAYED, decode_count, &mut resets)
        .await
        .unwrap_or_default();
    progress.badges = BadgeLedger::from_parts(earned, games_played);

    let streak = read(store, keys::DAILY_STREAK, decode_count, &mut resets)
        .await
        .unwrap_or_default();
    let last_daily = read(store, keys::LAST_DAILY_DATE, decode_date_key, &mut resets).await;
    progress.streak = StreakState::from_parts(last_daily, streak);

    let mut preferences = Preferences::default();
    if let Some(nickname) = read(store, keys::NICKNAME, decode_text, &mut resets).await {
        preferences.nickname = normalize_nickname(&nickname);
    }
    preferences.button_color = read(store, keys::BUTTON_COLOR, decode_text, &mut resets).await;
    preferences.chaos_mode = read(store, keys::CHAOS_MODE, decode_flag, &mut resets)
        .await
        .unwrap_or_default();
    preferences.color_scheme = read(store, keys::COLOR_SCHEME, decode_scheme, &mut resets)
        .await
        .unwrap_or_default();

    Hydrated {
        progress,
        preferences,
        resets,
    }
}

async fn read<T>(
    store: &dyn KeyValueStore,
    key: &str,
    decode: impl Fn(&str) -> Result<T, DecodeError>,
    resets: &mut Vec<KvWrite>,
) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(raw) => raw?,
        Err(err) => {
            warn!(key, error = %err, "storage read failed; using default");
            return None;
        }
    };

    match decode(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding malformed stored value");
            resets.push(KvWrite::remove(key));
            None
        }
    }
}

fn decode_text(raw: &str) -> Result<String, DecodeError> {
    Ok(raw.to_string())
}

fn decode_date_key(raw: &str) -> Result<DateKey, DecodeError> {
    Ok(DateKey::new(raw.trim()))
}

fn decode_scheme(raw: &str) -> Result<ColorScheme, DecodeError> {
    ColorScheme::parse(raw).ok_or_else(|| DecodeError::Flag(raw.to_string()))
}

enum PersistCommand {
    Apply(Vec<KvWrite>),
    Barrier(oneshot::Sender<()>),
}

/// Handle to the background writer. Batches are applied in submission order,
/// at most once, without retries.
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistenceHandle {
    /// Spawn the writer task on the current runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, rx));
        Self { tx }
    }

    /// Queue `writes` without waiting for them to land.
    pub fn submit(&self, writes: Vec<KvWrite>) {
        if writes.is_empty() {
            return;
        }
        if self.tx.send(PersistCommand::Apply(writes)).is_err() {
            warn!("persistence writer stopped; dropping writes");
        }
    }

    /// Wait until every batch queued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(PersistCommand::Barrier(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<PersistCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            PersistCommand::Apply(writes) => {
                for write in writes {
                    apply_write(store.as_ref(), write).await;
                }
            }
            PersistCommand::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("persistence writer exiting");
}

async fn apply_write(store: &dyn KeyValueStore, write: KvWrite) {
    let key = write.key().to_string();
    let result = match write {
        KvWrite::Set { key, value } => store.set(&key, value).await,
        KvWrite::Remove { key } => store.remove(&key).await,
    };
    match result {
        Ok(()) => debug!(key, "persisted"),
        Err(err) => warn!(key, error = %err, "storage write failed; value kept in memory only"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::kv_store::{failing::FailingStore, memory::MemoryStore};
    use crate::state::badges::Badge;

    #[tokio::test]
    async fn empty_store_hydrates_defaults() {
        let store = MemoryStore::new();
        let hydrated = hydrate(&store, ["Easy", "Medium"]).await;
        assert_eq!(hydrated.progress.badges.games_played(), 0);
        assert_eq!(hydrated.progress.streak.length(), 0);
        assert!(hydrated.progress.leaderboards.entries("Easy").is_empty());
        assert_eq!(hydrated.preferences, Preferences::default());
        assert!(hydrated.resets.is_empty());
    }

    #[tokio::test]
    async fn stored_values_are_restored() {
        let store = MemoryStore::with_entries([
            ("highscore_Easy", "4.2"),
            ("leaderboard_Easy", "[6.1, 4.2, 5.0]"),
            ("leaderboard_Daily", "[14.0]"),
            ("badges", r#"["First Win"]"#),
            ("gamesPlayed", "3"),
            ("dailyStreak", "2"),
            ("lastDailyDate", "2024-1-1"),
            ("nickname", "Ada"),
            ("chaosMode", "true"),
            ("colorScheme", "dark"),
        ]);
        let hydrated = hydrate(&store, ["Easy"]).await;
        let progress = &hydrated.progress;

        assert_eq!(progress.leaderboards.entries("Easy"), &[4.2, 5.0, 6.1]);
        assert_eq!(progress.leaderboards.best_time("Easy"), Some(4.2));
        assert_eq!(progress.leaderboards.entries("Daily"), &[14.0]);
        assert!(progress.badges.has(Badge::FirstWin));
        assert_eq!(progress.badges.games_played(), 3);
        assert_eq!(progress.streak.length(), 2);
        assert_eq!(
            progress.streak.last_completed(),
            Some(&DateKey::new("2024-1-1"))
        );
        assert_eq!(hydrated.preferences.nickname, "Ada");
        assert!(hydrated.preferences.chaos_mode);
        assert_eq!(hydrated.preferences.color_scheme, ColorScheme::Dark);
    }

    #[tokio::test]
    async fn malformed_values_are_reset() {
        let store = MemoryStore::with_entries([
            ("leaderboard_Medium", "[1, oops"),
            ("badges", "not json"),
            ("gamesPlayed", "NaN"),
        ]);
        let hydrated = hydrate(&store, ["Medium"]).await;
        assert!(hydrated.progress.leaderboards.entries("Medium").is_empty());
        assert_eq!(hydrated.progress.badges.games_played(), 0);
        let reset_keys: Vec<_> = hydrated.resets.iter().map(KvWrite::key).collect();
        assert_eq!(
            reset_keys,
            vec!["leaderboard_Medium", "badges", "gamesPlayed"]
        );
    }

    #[tokio::test]
    async fn writer_applies_batches_in_order() {
        let store = MemoryStore::new();
        let handle = PersistenceHandle::spawn(Arc::new(store.clone()));
        handle.submit(vec![KvWrite::set("a", "1"), KvWrite::set("b", "2")]);
        handle.submit(vec![KvWrite::set("a", "3"), KvWrite::remove("b")]);
        handle.flush().await;

        assert_eq!(store.peek("a").as_deref(), Some("3"));
        assert_eq!(store.peek("b"), None);
    }

    #[tokio::test]
    async fn unreachable_store_hydrates_defaults_without_resets() {
        let store = FailingStore::unreachable();
        store.inner().set("gamesPlayed", "4".into()).await.unwrap();

        let hydrated = hydrate(&store, ["Easy"]).await;
        assert_eq!(hydrated.progress.badges.games_played(), 0);
        assert!(hydrated.progress.leaderboards.entries("Easy").is_empty());
        assert_eq!(hydrated.preferences, Preferences::default());
        assert!(hydrated.resets.is_empty());
    }

    #[tokio::test]
    async fn failed_read_of_one_key_keeps_the_others() {
        let store = FailingStore::rejecting(|key| key == "badges");
        store.inner().set("gamesPlayed", "2".into()).await.unwrap();

        let hydrated = hydrate(&store, ["Easy"]).await;
        assert_eq!(hydrated.progress.badges.games_played(), 2);
        assert_eq!(hydrated.progress.badges.earned().count(), 0);
        assert!(hydrated.resets.is_empty());
    }

    #[tokio::test]
    async fn failed_writes_do_not_stop_later_batches() {
        let store = FailingStore::rejecting(|key| key == "b");
        let handle = PersistenceHandle::spawn(Arc::new(store.clone()));
        handle.submit(vec![KvWrite::set("a", "1"), KvWrite::set("b", "2")]);
        handle.submit(vec![KvWrite::set("c", "3")]);
        handle.flush().await;

        let inner = store.inner();
        assert_eq!(inner.peek("a").as_deref(), Some("1"));
        assert_eq!(inner.peek("b"), None);
        assert_eq!(inner.peek("c").as_deref(), Some("3"));
    }
}
