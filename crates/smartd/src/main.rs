//! smartd - Smart marketplace server daemon
//!
//! HTTP gateway for the users, products and bids collections.
//!
//! Configuration comes from environment variables (a `.env` file in the
//! working directory is loaded first). With `SMART_STORE=memory` the server
//! runs on an in-process store for demo purposes.

mod config;

use std::sync::Arc;

use anyhow::Context;
use smart_api::{create_router, AppState};
use smart_core::{DocumentStore, MemoryStore};
use smart_mongo::MongoStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat, StoreKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    tracing::info!("Starting smartd (Smart marketplace server)");

    let store = open_store(&config.store).await?;
    tracing::info!(backend = store.backend_name(), "Document store ready");

    let state = AppState::new(store.clone()).with_auth_policy(config.auth_policy);
    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(auth = ?config.auth_policy, "Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, releasing document store");
    store.shutdown().await;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "smartd=info,smart_api=info,smart_mongo=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with((format == LogFormat::Text).then(|| tracing_subscriber::fmt::layer()))
        .with((format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json()))
        .init();
}

/// Acquire the store before the listener binds; no retry on failure
async fn open_store(kind: &StoreKind) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match kind {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Mongo(mongo) => match MongoStore::connect(mongo).await {
            Ok(store) => Ok(Arc::new(store)),
            Err(e) => {
                tracing::error!(error = %e, "Could not connect to MongoDB");
                Err(e).context("document store unavailable at startup")
            }
        },
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
