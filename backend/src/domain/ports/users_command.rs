//! Driving port for user registration and profile changes.

use async_trait::async_trait;

use crate::domain::{Email, Error, User};

/// Mutations on user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user. Fails with a conflict when the email is taken.
    async fn register(&self, user: User) -> Result<User, Error>;

    /// Replace a stored profile in full.
    async fn update(&self, user: User) -> Result<User, Error>;

    /// Remove the profile registered under `email`.
    async fn delete(&self, email: &Email) -> Result<(), Error>;
}
