use serde::Serialize;
use utoipa::ToSchema;

/// Where player progress currently lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// Written to durable storage.
    Persistent,
    /// Kept in process memory; lost on restart.
    MemoryOnly,
    /// The store stopped answering; the game runs from memory.
    Unreachable,
}

/// Body of `/healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the store is unreachable.
    pub status: String,
    /// Key-value store state.
    pub store: StoreStatus,
}

impl From<StoreStatus> for HealthResponse {
    fn from(store: StoreStatus) -> Self {
        let status = match store {
            StoreStatus::Unreachable => "degraded",
            StoreStatus::Persistent | StoreStatus::MemoryOnly => "ok",
        };
        Self {
            status: status.to_string(),
            store,
        }
    }
}
