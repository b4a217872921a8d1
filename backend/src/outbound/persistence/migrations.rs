//! Embedded schema migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a dedicated blocking connection.
///
/// Call from a blocking context (for example `tokio::task::spawn_blocking`).
/// Returns the number of migrations applied.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, PoolError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PoolError::checkout(format!("migration connection: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(format!("migration failed: {err}")))?;
    for version in &applied {
        info!(%version, "migration applied");
    }
    Ok(applied.len())
}
