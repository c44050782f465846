use tracing::warn;

use crate::{
    dto::health::{HealthResponse, StoreStatus},
    state::SharedState,
};

/// Probe the key-value store. The game keeps running from memory either way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = state.store();
    let status = match store.health_check().await {
        Ok(()) if store.is_durable() => StoreStatus::Persistent,
        Ok(()) => StoreStatus::MemoryOnly,
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            StoreStatus::Unreachable
        }
    };
    status.into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::date;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::kv_store::{KeyValueStore, failing::FailingStore, memory::MemoryStore},
        services::feedback::LogFeedback,
        state::{AppState, daily::FixedDay},
    };

    async fn status_with(store: Arc<dyn KeyValueStore>) -> HealthResponse {
        let state = AppState::bootstrap(
            AppConfig::default(),
            store,
            Arc::new(FixedDay(date!(2024 - 01 - 02))),
            Arc::new(LogFeedback),
        )
        .await;
        health_status(&state).await
    }

    #[tokio::test]
    async fn memory_store_is_healthy_but_volatile() {
        let health = status_with(Arc::new(MemoryStore::new())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.store, StoreStatus::MemoryOnly);
    }

    #[tokio::test]
    async fn unreachable_store_reports_degraded() {
        let health = status_with(Arc::new(FailingStore::unreachable())).await;
        assert_eq!(health.status, "degraded");
        assert_eq!(health.store, StoreStatus::Unreachable);
    }
}
