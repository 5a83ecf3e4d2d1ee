//! Store of live password-reset tokens, keyed by token value.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ResetToken;
use crate::errors::AppResult;

/// Store of live password-reset tokens.
///
/// `take` is the consumption primitive: lookup and removal happen as
/// one operation, so two concurrent consumers of the same value get at
/// most one hit between them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn save(&self, token: ResetToken) -> AppResult<()>;

    /// Remove and return the token with this value, if present.
    async fn take(&self, value: &str) -> AppResult<Option<ResetToken>>;
}

/// In-memory token store; one mutex makes check-and-delete atomic.
#[derive(Default)]
pub struct InMemoryTokens {
    tokens: Mutex<HashMap<String, ResetToken>>,
}

impl InMemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokens {
    async fn save(&self, token: ResetToken) -> AppResult<()> {
        self.tokens
            .lock()
            .await
            .insert(token.value.clone(), token);
        Ok(())
    }

    async fn take(&self, value: &str) -> AppResult<Option<ResetToken>> {
        Ok(self.tokens.lock().await.remove(value))
    }
}
