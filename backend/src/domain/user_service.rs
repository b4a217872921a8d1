//! User profile service implementing the user driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{UserRepository, UsersCommand, UsersQuery};
use super::repository_errors::map_user_repository_error;
use super::{Email, Error, User};

/// Registration and profile maintenance backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
}

impl<R> UserService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn user_not_found(email: &Email) -> Error {
    Error::not_found(format!("user {email} not found"))
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn register(&self, user: User) -> Result<User, Error> {
        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(email = %user.email(), "user registered");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, Error> {
        let matched = self
            .users
            .replace(&user)
            .await
            .map_err(map_user_repository_error)?;
        if matched == 0 {
            return Err(user_not_found(user.email()));
        }
        Ok(user)
    }

    async fn delete(&self, email: &Email) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(email)
            .await
            .map_err(map_user_repository_error)?;
        if deleted == 0 {
            return Err(user_not_found(email));
        }
        info!(%email, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get(&self, email: &Email) -> Result<User, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(email))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
