//! In-memory UserRepository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Email, RepositoryError, User, UserRepository};

/// In-memory user store keyed by email.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        let key = user.email.as_str().to_string();
        if users.contains_key(&key) {
            return Err(RepositoryError::UserAlreadyExists(key));
        }
        users.insert(key, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .get(email.as_str())
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(email.as_str().to_string()))
    }

    async fn all_except(&self, excluding: &Email) -> Vec<User> {
        let users = self.users.lock().await;
        let mut result: Vec<User> = users
            .values()
            .filter(|u| u.email != *excluding)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.email.as_str().cmp(b.email.as_str()));
        result
    }
}
