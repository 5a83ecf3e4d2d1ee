//! Token service: single-use, time-limited password-reset tokens.

use std::sync::Arc;

use crate::config::DEFAULT_RESET_TOKEN_TTL_SECS;
use crate::domain::ResetToken;
use crate::errors::{AppError, AppResult};
use crate::infra::TokenRepository;

/// Issues and consumes password-reset tokens.
pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>) -> Self {
        Self::with_ttl(tokens, DEFAULT_RESET_TOKEN_TTL_SECS)
    }

    pub fn with_ttl(tokens: Arc<dyn TokenRepository>, ttl_secs: i64) -> Self {
        Self { tokens, ttl_secs }
    }

    /// Generate and persist a token bound to `username`.
    ///
    /// The value is returned to the orchestrator for out-of-band
    /// delivery only; it is never part of an HTTP response.
    pub async fn issue(&self, username: &str) -> AppResult<ResetToken> {
        let token = ResetToken::issue(username, self.ttl_secs);
        tracing::debug!(%username, token = %token.value, "Issuing password-reset token");
        self.tokens.save(token.clone()).await?;
        Ok(token)
    }

    /// Consume a token, returning the bound username.
    ///
    /// The repository removes the record in the same step as the
    /// lookup, so consumption succeeds at most once. Absent and
    /// expired tokens fail identically.
    pub async fn consume(&self, value: &str) -> AppResult<String> {
        let token = self
            .tokens
            .take(value)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        if token.is_expired() {
            tracing::debug!(username = %token.username, "Rejected expired reset token");
            return Err(AppError::TokenInvalid);
        }

        Ok(token.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryTokens;

    fn service() -> TokenService {
        TokenService::new(Arc::new(InMemoryTokens::new()))
    }

    #[tokio::test]
    async fn issued_token_consumes_once() {
        let service = service();
        let token = service.issue("user").await.unwrap();

        assert_eq!(service.consume(&token.value).await.unwrap(), "user");

        // second consumption fails regardless of elapsed time
        assert!(matches!(
            service.consume(&token.value).await.unwrap_err(),
            AppError::TokenInvalid
        ));
    }

    #[tokio::test]
    async fn unknown_token_fails() {
        let service = service();
        assert!(matches!(
            service.consume("no-such-token").await.unwrap_err(),
            AppError::TokenInvalid
        ));
    }

    #[tokio::test]
    async fn expired_token_fails_on_first_use() {
        let tokens = Arc::new(InMemoryTokens::new());
        let service = TokenService::with_ttl(Arc::clone(&tokens) as Arc<dyn TokenRepository>, -1);
        let token = service.issue("user").await.unwrap();

        assert!(matches!(
            service.consume(&token.value).await.unwrap_err(),
            AppError::TokenInvalid
        ));

        // the expired record was deleted on the failed attempt
        assert!(tokens.take(&token.value).await.unwrap().is_none());
    }
}
