//! Password-reset token entity.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Ephemeral credential-override capability bound to one user.
///
/// Valid strictly before `expires_at` and only until first consumption;
/// the record is removed from the store when consumed.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Opaque random token value, unique across live tokens
    pub value: String,
    /// Username of the bound account
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Issue a fresh token for `username`, expiring `ttl_secs` from now.
    pub fn issue(username: &str, ttl_secs: i64) -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            username: username.to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        }
    }

    /// Wall-clock expiry check, no grace period.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
