//! Carpool backend entry-point: loads settings, prepares persistence and
//! serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carpool::inbound::http::health::HealthState;
use carpool::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{CarpoolSettings, ServerConfig, create_server};

async fn prepare_pool(pool_config: PoolConfig, run_migrations: bool) -> Result<DbPool> {
    if run_migrations {
        let url = pool_config.database_url().to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .wrap_err("migration task panicked")?
            .map_err(|err| eyre!(err))
            .wrap_err("failed to apply database migrations")?;
        info!(applied, "database migrations applied");
    }
    DbPool::new(pool_config)
        .await
        .map_err(|err| eyre!(err))
        .wrap_err("failed to build database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = CarpoolSettings::load()
        .map_err(|err| eyre!("failed to load settings: {err}"))?;

    let mut config = ServerConfig::new(settings.bind_addr());
    if let Some(pool_config) = settings.pool_config() {
        let pool = prepare_pool(pool_config, settings.run_migrations()).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting carpool server");
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
