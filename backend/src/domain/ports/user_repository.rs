//! Driven port for user persistence.
use async_trait::async_trait;

use crate::domain::{Email, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with the same email is already stored.
        Duplicate { email: String } => "user {email} already exists",
    }
}

/// Store of registered users keyed by email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user, failing with [`UserRepositoryError::Duplicate`] when
    /// the email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Replace every field of the stored user with the same email.
    ///
    /// Returns the number of matched records (0 or 1).
    async fn replace(&self, user: &User) -> Result<u64, UserRepositoryError>;

    /// Remove a user, returning the number of deleted records.
    async fn delete(&self, email: &Email) -> Result<u64, UserRepositoryError>;
}
