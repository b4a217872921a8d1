//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel row structs and domain
//! types, running on `diesel-async` connections checked out from a `bb8`
//! pool. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.

mod diesel_basic_error_mapping;
mod diesel_ride_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ride_repository::DieselRideRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
