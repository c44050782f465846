pub mod badges;
pub mod clock;
pub mod daily;
pub mod engine;
pub mod leaderboard;
pub mod preferences;
pub mod sequence;
pub mod session;
mod sse;
pub mod state_machine;
pub mod streak;
pub mod tier;

use std::sync::Arc;

use tokio::{
    sync::{Mutex, MutexGuard, watch},
    task::JoinHandle,
};
use tracing::info;

use crate::{
    config::AppConfig,
    dao::kv_store::KeyValueStore,
    services::{
        feedback::FeedbackSink,
        persistence::{self, PersistenceHandle},
    },
    state::{
        daily::{DailyChallenge, DayProvider},
        engine::GameEngine,
        preferences::Preferences,
    },
};

pub use self::sse::SseHub;

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

const SSE_CAPACITY: usize = 64;

/// Central application state: the engine, its collaborators and the
/// background task driving the live session.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn KeyValueStore>,
    engine: Mutex<GameEngine>,
    preferences: watch::Sender<Preferences>,
    sse: SseHub,
    session_driver: Mutex<Option<JoinHandle<()>>>,
    days: Arc<dyn DayProvider>,
    feedback: Arc<dyn FeedbackSink>,
    persistence: PersistenceHandle,
}

impl AppState {
    /// Hydrate persisted progress from `store` and assemble the shared state.
    ///
    /// Must run inside a Tokio runtime; the persistence writer is spawned here.
    pub async fn bootstrap(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        days: Arc<dyn DayProvider>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> SharedState {
        let hydrated = persistence::hydrate(
            store.as_ref(),
            config.tiers().iter().map(|tier| tier.label.as_str()),
        )
        .await;

        let persistence = PersistenceHandle::spawn(store.clone());
        if !hydrated.resets.is_empty() {
            info!(keys = hydrated.resets.len(), "resetting malformed stored values");
            persistence.submit(hydrated.resets);
        }

        let engine = GameEngine::new(
            config.tiers().to_vec(),
            config.default_tier(),
            hydrated.progress,
        );
        let (preferences, _rx) = watch::channel(hydrated.preferences);

        Arc::new(Self {
            config,
            store,
            engine: Mutex::new(engine),
            preferences,
            sse: SseHub::new(SSE_CAPACITY),
            session_driver: Mutex::new(None),
            days,
            feedback,
            persistence,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Backing key-value store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Lock the game engine. Keep the guard short-lived and never hold it
    /// across a storage call.
    pub async fn engine(&self) -> MutexGuard<'_, GameEngine> {
        self.engine.lock().await
    }

    /// Current preferences.
    pub fn preferences(&self) -> Preferences {
        self.preferences.borrow().clone()
    }

    /// Sender side of the preferences channel.
    pub(crate) fn preferences_sender(&self) -> &watch::Sender<Preferences> {
        &self.preferences
    }

    /// Subscribe to preference changes.
    pub fn preferences_watcher(&self) -> watch::Receiver<Preferences> {
        self.preferences.subscribe()
    }

    /// Broadcast hub used for the SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Sink for tap and win feedback.
    pub fn feedback(&self) -> &dyn FeedbackSink {
        self.feedback.as_ref()
    }

    /// Ordered writer for storage effects.
    pub fn persistence(&self) -> &PersistenceHandle {
        &self.persistence
    }

    /// Challenge for the current calendar day.
    pub fn daily_challenge(&self) -> DailyChallenge {
        DailyChallenge::for_date(&self.days.today_key())
    }

    /// Install the task driving the live session, cancelling any previous one.
    pub(crate) async fn replace_session_driver(&self, handle: JoinHandle<()>) {
        let mut guard = self.session_driver.lock().await;
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the task driving the live session, if any.
    pub(crate) async fn cancel_session_driver(&self) {
        let mut guard = self.session_driver.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }
}
