//! PostgreSQL pool for the reservation store.
//!
//! Every pooled connection starts with the reservation session settings:
//! `lock_timeout` bounds how long any statement waits for an event or
//! reservation row held by another transaction, and `application_name`
//! tags the sessions in `pg_stat_activity`.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use rsvp_core::config::{DatabaseConfig, ReservationConfig};
use rsvp_core::error::{AppError, ErrorKind};
use rsvp_core::result::AppResult;

/// `application_name` reported by every connection.
pub const APPLICATION_NAME: &str = "rsvp-server";

/// Pool of connections configured for reservation units of work.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
    lock_timeout: Duration,
}

impl DatabasePool {
    /// Connect using the database settings and the reservation lock timeout.
    pub async fn connect(config: &DatabaseConfig, reservation: &ReservationConfig) -> AppResult<Self> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }

        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            lock_timeout_ms = reservation.lock_timeout_ms,
            "Connecting to PostgreSQL"
        );

        let connect_options = PgConnectOptions::from_str(&config.url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid database URL: {e}"),
                e,
            )
        })?;

        let pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        let db = Self::connect_with(pool_options, connect_options, reservation.lock_timeout()).await?;
        info!("Connected to PostgreSQL");
        Ok(db)
    }

    /// Connect with explicit pool and connection options. The reservation
    /// session settings are added to `connect_options`.
    pub async fn connect_with(
        pool_options: PgPoolOptions,
        connect_options: PgConnectOptions,
        lock_timeout: Duration,
    ) -> AppResult<Self> {
        let pool = pool_options
            .connect_with(session_settings(connect_options, lock_timeout))
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ServiceUnavailable,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        Ok(Self { pool, lock_timeout })
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Row lock wait bound applied to every connection.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::ServiceUnavailable, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Session parameters sent in the startup packet of each connection.
fn session_settings(options: PgConnectOptions, lock_timeout: Duration) -> PgConnectOptions {
    options
        .application_name(APPLICATION_NAME)
        .options([("lock_timeout", format!("{}ms", lock_timeout.as_millis()))])
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
