//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::{
    Config, DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, DEFAULT_USER_USERNAME, ROLE_ADMIN,
};
use crate::domain::{Password, User};
use crate::errors::AppResult;
use crate::infra::{InMemoryTokens, InMemoryUsers, LogMailer, Mailer, UserRepository};
use crate::services::{AccountManager, AccountService, SessionRegistry, TokenService};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Account lifecycle orchestrator
    pub accounts: Arc<dyn AccountService>,
    /// Session registry, shared with the orchestrator
    pub sessions: Arc<SessionRegistry>,
    /// Credential store, shared with the orchestrator
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wire the default stack: in-memory stores, logging mailer.
    pub fn from_config(config: &Config) -> Self {
        Self::with_infra(
            Arc::new(InMemoryUsers::new()),
            Arc::new(LogMailer::new()),
            config,
        )
    }

    /// Wire the orchestrator over injected store and mailer
    /// implementations (tests swap these out).
    pub fn with_infra(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let tokens = Arc::new(TokenService::with_ttl(
            Arc::new(InMemoryTokens::new()),
            config.reset_token_ttl_secs,
        ));
        let accounts = Arc::new(AccountManager::new(
            Arc::clone(&users),
            Arc::clone(&sessions),
            tokens,
            mailer,
            config.public_url.clone(),
        ));

        Self {
            accounts,
            sessions,
            users,
        }
    }

    /// Seed the bootstrap administrator and the demonstration user if
    /// they do not exist yet.
    pub async fn seed_accounts(&self, config: &Config) -> AppResult<()> {
        if !self.users.exists_by_username(&config.admin_username).await? {
            let hash = Password::new(config.admin_password())?.into_string();
            let admin = User::new(
                config.admin_username.clone(),
                hash,
                Some(config.admin_email.clone()),
            )
            .with_authority(ROLE_ADMIN);

            self.users.create(admin).await?;
            tracing::info!(username = %config.admin_username, "Seeded administrator account");
        }

        if !self.users.exists_by_username(DEFAULT_USER_USERNAME).await? {
            let hash = Password::new(DEFAULT_USER_PASSWORD)?.into_string();
            let user = User::new(
                DEFAULT_USER_USERNAME.to_string(),
                hash,
                Some(DEFAULT_USER_EMAIL.to_string()),
            );

            self.users.create(user).await?;
            tracing::info!(username = DEFAULT_USER_USERNAME, "Seeded demonstration account");
        }

        Ok(())
    }
}
