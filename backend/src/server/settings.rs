//! Server settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `CARPOOL_*` environment variables over the
//! defaults below.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use carpool::outbound::persistence::{DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, PoolConfig};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the carpool server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CARPOOL")]
pub struct CarpoolSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// TCP port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string. Without one the server keeps its data
    /// in memory.
    pub database_url: Option<String>,
    pub pool_max_size: Option<u32>,
    pub pool_connection_timeout_secs: Option<u64>,
    /// Serve without applying embedded migrations first.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl CarpoolSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let timeout = self
            .pool_connection_timeout_secs
            .map_or(DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs);
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_MAX_SIZE))
                .with_connection_timeout(timeout),
        )
    }
}

impl Default for CarpoolSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            database_url: None,
            pool_max_size: None,
            pool_connection_timeout_secs: None,
            skip_migrations: false,
        }
    }
}
