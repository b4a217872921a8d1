//! In-memory user repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, User};

/// User store backed by a map keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Email, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.email()) {
            return Err(UserRepositoryError::duplicate(user.email().as_ref()));
        }
        users.insert(user.email().clone(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn replace(&self, user: &User) -> Result<u64, UserRepositoryError> {
        let mut users = self.users.write().await;
        match users.get_mut(user.email()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, email: &Email) -> Result<u64, UserRepositoryError> {
        Ok(u64::from(self.users.write().await.remove(email).is_some()))
    }
}
