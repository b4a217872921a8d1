//! Driving port for reading user profiles.

use async_trait::async_trait;

use crate::domain::{Email, Error, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch the profile registered under `email`.
    async fn get(&self, email: &Email) -> Result<User, Error>;
}
