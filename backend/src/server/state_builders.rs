//! Builders for the HTTP state: Diesel-backed repositories when a pool is
//! configured, in-memory repositories otherwise.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use carpool::inbound::http::state::HttpState;
use carpool::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};
use carpool::outbound::persistence::{DbPool, DieselRideRepository, DieselUserRepository};

use super::ServerConfig;

fn diesel_state(pool: &DbPool) -> HttpState {
    HttpState::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselRideRepository::new(pool.clone())),
    )
}

fn memory_state() -> HttpState {
    HttpState::from_repositories(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryRideRepository::new()),
    )
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_state(pool)
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            memory_state()
        }
    };
    web::Data::new(state)
}
