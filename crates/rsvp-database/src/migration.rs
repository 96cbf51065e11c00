//! Schema migrations for the events and reservations tables.

use sqlx::migrate::Migrator;
use tracing::info;

use rsvp_core::error::{AppError, ErrorKind};
use rsvp_core::result::AppResult;

use crate::connection::DatabasePool;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to the newest embedded migration.
pub async fn run_migrations(db: &DatabasePool) -> AppResult<()> {
    let target = latest_version();
    info!(target_version = ?target, "Applying schema migrations");

    MIGRATOR.run(db.pool()).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to migrate schema to version {target:?}: {e}"),
            e,
        )
    })?;

    info!(version = ?target, "Schema is up to date");
    Ok(())
}

/// Version of the newest embedded migration.
pub fn latest_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_creates_reservation_tables() {
        assert_eq!(latest_version(), Some(1));

        let init = MIGRATOR
            .iter()
            .find(|m| m.version == 1)
            .expect("initial migration is embedded");
        assert!(init.sql.contains("reservations_user_event_unique"));
        assert!(init.sql.contains("events_occupancy_within_capacity"));
    }
}
