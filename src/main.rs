//! RSVP Server: event seat reservations over HTTP.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use rsvp_core::config::{AppConfig, StoreBackend};
use rsvp_database::{DatabasePool, MemoryReservationStore, PgReservationStore, ReservationStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("RSVP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(%env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting RSVP server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Backing store ────────────────────────────────────
    let (store, db_pool) = build_store(&config).await?;

    // ── Step 2: Services + router ────────────────────────────────
    let state = rsvp_api::AppState::new(config.clone(), store);
    let app = rsvp_api::build_app(state);

    // ── Step 3: Serve ────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("RSVP server listening on {}", addr);

    // The server drains in-flight requests after the signal, for at most
    // `shutdown_grace_seconds`.
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result.context("Server error")?,
        _ = async {
            match shutdown_rx.wait_for(|&started| started).await {
                Ok(_) => tokio::time::sleep(grace).await,
                Err(_) => std::future::pending::<()>().await,
            }
        } => tracing::warn!("Graceful shutdown deadline reached, exiting"),
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("RSVP server stopped");
    Ok(())
}

/// Build the configured store. PostgreSQL also returns its pool so it can be
/// closed on shutdown.
async fn build_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn ReservationStore>, Option<DatabasePool>)> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database, &config.reservation)
                .await
                .context("Database connection failed")?;

            if config.database.run_migrations {
                rsvp_database::migration::run_migrations(&pool)
                    .await
                    .context("Migration failed")?;
            }

            let store = PgReservationStore::new(pool.clone());
            Ok((Arc::new(store), Some(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!(
                "Using the in-memory store: reservations are lost on restart and cannot be shared across instances"
            );
            let store = MemoryReservationStore::new(config.reservation.lock_timeout());
            Ok((Arc::new(store), None))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
