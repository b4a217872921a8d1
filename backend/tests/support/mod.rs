//! Helpers shared by the Diesel integration suites.

use std::fmt::Display;

use carpool::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Whether `SKIP_TEST_CLUSTER` is set to "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when `SKIP_TEST_CLUSTER` is set, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create a uniquely named database on `cluster` with every migration applied.
pub fn provision_database(
    cluster: &TestCluster,
    prefix: &str,
) -> Result<TemporaryDatabase, String> {
    let name = format!("{prefix}_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database {name}: {err:?}"))?;
    run_pending_migrations(database.url()).map_err(|err| err.to_string())?;
    Ok(database)
}

/// Open a small pool against `database_url` on `runtime`.
pub fn open_pool(runtime: &Runtime, database_url: &str, max_size: u32) -> Result<DbPool, String> {
    let config = PoolConfig::new(database_url)
        .with_max_size(max_size)
        .with_min_idle(Some(1));
    runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())
}
