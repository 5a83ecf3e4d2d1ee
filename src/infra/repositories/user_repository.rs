//! Credential store: user records keyed by username.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Store of user records.
///
/// Stores and retrieves opaque password hashes; no verification happens
/// here. Absence is always an `Ok(None)` / `false`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; `Conflict` if the username is already taken.
    async fn create(&self, user: User) -> AppResult<()>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// First user carrying the given email, if any (uniqueness of email
    /// is not enforced).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Replace the stored record atomically; `NotFound` if absent.
    async fn update(&self, user: User) -> AppResult<()>;

    /// Remove the user and its authorities in one step; `NotFound` if
    /// absent.
    async fn delete(&self, username: &str) -> AppResult<()>;

    /// All users, in unspecified order.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// In-memory credential store.
///
/// A single `RwLock` over the map makes each operation atomic. The
/// authorities set lives inside the record, so user deletion cascades
/// to it by construction.
#[derive(Default)]
pub struct InMemoryUsers {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::conflict("Username"));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn update(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.username) {
            return Err(AppError::NotFound);
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        match self.users.write().await.remove(username) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound),
        }
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}
