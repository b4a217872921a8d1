//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    RideCommand, RideQuery, RideRepository, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{RideService, UserService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub rides: Arc<dyn RideCommand>,
    pub rides_query: Arc<dyn RideQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub rides: Arc<dyn RideCommand>,
    pub rides_query: Arc<dyn RideQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            users_query,
            rides,
            rides_query,
        } = ports;
        Self {
            users,
            users_query,
            rides,
            rides_query,
        }
    }

    /// Wire the domain services over a pair of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use carpool::inbound::http::state::HttpState;
    /// use carpool::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};
    ///
    /// let state = HttpState::from_repositories(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(InMemoryRideRepository::default()),
    /// );
    /// let _rides = state.rides.clone();
    /// ```
    pub fn from_repositories<U, R>(users: Arc<U>, rides: Arc<R>) -> Self
    where
        U: UserRepository + 'static,
        R: RideRepository + 'static,
    {
        let user_service = Arc::new(UserService::new(users.clone()));
        let ride_service = Arc::new(RideService::new(rides, users));
        Self::new(HttpStatePorts {
            users: user_service.clone(),
            users_query: user_service,
            rides: ride_service.clone(),
            rides_query: ride_service,
        })
    }
}
