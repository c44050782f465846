//! Number Click backend entrypoint wiring REST, SSE and the key-value store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use number_click_back::{
    config::AppConfig,
    dao::kv_store::KeyValueStore,
    routes,
    services::feedback::LogFeedback,
    state::{AppState, SharedState, daily::LocalDay},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = open_store(&config).await;
    let app_state =
        AppState::bootstrap(config, store, Arc::new(LocalDay), Arc::new(LogFeedback)).await;

    let app = build_router(app_state.clone());

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    // Let queued progress reach the store before exiting.
    app_state.persistence().flush().await;
    info!("server stopped");
    Ok(())
}

#[cfg(feature = "file-store")]
async fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    number_click_back::dao::kv_store::file::open_or_memory(config.store_path().clone()).await
}

#[cfg(not(feature = "file-store"))]
async fn open_store(_config: &AppConfig) -> Arc<dyn KeyValueStore> {
    use number_click_back::dao::kv_store::memory::MemoryStore;

    tracing::warn!("file-store feature disabled; progress is kept in memory only");
    Arc::new(MemoryStore::new())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
