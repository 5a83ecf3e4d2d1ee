//! User domain entity and related types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User aggregate.
///
/// The username is the immutable identity key. The authorities set is
/// owned by the user record, so deleting the user removes its
/// authorities in the same step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub authorities: BTreeSet<String>,
}

impl User {
    /// Create an enabled user with the default `ROLE_USER` authority.
    pub fn new(username: String, password_hash: String, email: Option<String>) -> Self {
        let mut authorities = BTreeSet::new();
        authorities.insert(ROLE_USER.to_string());
        Self {
            username,
            password_hash,
            email,
            enabled: true,
            authorities,
        }
    }

    /// Grant an additional authority.
    pub fn with_authority(mut self, authority: &str) -> Self {
        self.authorities.insert(authority.to_string());
        self
    }

    /// Check if the user carries the admin authority.
    pub fn is_admin(&self) -> bool {
        self.authorities.contains(ROLE_ADMIN)
    }
}

/// Sign-up request payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUp {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub email: Option<String>,
}

/// Profile update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub password: Option<String>,
    pub email: Option<String>,
}

/// User response (safe to return to client).
///
/// The outward JSON shape is exactly `{username, email}`; the password
/// hash and the authority set never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub email: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
