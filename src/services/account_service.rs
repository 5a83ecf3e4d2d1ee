//! Account lifecycle orchestrator.
//!
//! Coordinates registration, login, profile mutation and the
//! forgot/reset-password flow across the credential store, the session
//! registry and the token service, and enforces the invariants that
//! couple them (sessions die with the password that authenticated
//! them).

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{HOME_PATH, RESET_PASSWORD_PATH};
use crate::domain::password::DUMMY_HASH;
use crate::domain::{Password, SignUp, UpdateProfile, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{EmailMessage, Mailer, UserRepository};
use crate::services::{SessionId, SessionRegistry, TokenService};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub username: String,
    pub session: SessionId,
}

/// Account lifecycle operations.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a new account with the default role.
    async fn register(&self, request: SignUp) -> AppResult<User>;

    /// Verify credentials without opening a session (basic-auth
    /// requests). Failures are uniform regardless of whether the
    /// username exists.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User>;

    /// Verify credentials and open a session, superseding any session
    /// the user already holds.
    async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome>;

    /// Destroy one session.
    fn logout(&self, session: &SessionId);

    async fn get_profile(&self, username: &str) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Apply the present fields; a password change revokes the user's
    /// sessions before returning.
    async fn update_profile(&self, username: &str, changes: UpdateProfile) -> AppResult<User>;

    /// Revoke sessions and remove the account with its authorities.
    async fn delete(&self, username: &str) -> AppResult<()>;

    /// Issue a reset token and dispatch the reset link by email.
    /// Completes without error whether or not the email is registered.
    async fn forgot_password(&self, email: &str) -> AppResult<()>;

    /// Consume a reset token and store the new password for the bound
    /// user, revoking that user's sessions.
    async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()>;
}

/// Concrete orchestrator over the store, registry, token service and
/// mailer seams.
pub struct AccountManager {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionRegistry>,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
    /// Base URL embedded in reset links
    public_url: String,
}

impl AccountManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionRegistry>,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn Mailer>,
        public_url: String,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            mailer,
            public_url,
        }
    }

    fn reset_link(&self, token_value: &str) -> String {
        format!(
            "{}{}{}?token={}",
            self.public_url, HOME_PATH, RESET_PASSWORD_PATH, token_value
        )
    }

    /// Dispatch fire-and-forget: the HTTP response never waits on the
    /// mail backend, and a delivery failure is logged, not propagated.
    fn dispatch_email(&self, message: EmailMessage) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            let to = message.to.clone();
            if let Err(e) = mailer.send(message).await {
                tracing::warn!(%to, error = %e, "Password-reset email dispatch failed");
            }
        });
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, request: SignUp) -> AppResult<User> {
        let password_hash = Password::new(&request.password)?.into_string();
        let user = User::new(request.username, password_hash, request.email);

        // the store's create is the uniqueness check; no separate
        // exists round-trip that a concurrent sign-up could race
        self.users.create(user.clone()).await?;
        tracing::info!(username = %user.username, "Registered new account");
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.users.find_by_username(username).await?;

        // Verify against a dummy hash when the user is absent so the
        // work done is the same either way (no timing signal).
        let hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(DUMMY_HASH);
        let password_valid = Password::from_hash(hash.to_string()).verify(password);

        match user {
            Some(u) if password_valid && u.enabled => Ok(u),
            _ => Err(AppError::Unauthorized),
        }
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self.authenticate(username, password).await?;

        let session = self.sessions.create_session(&user.username);
        tracing::info!(username = %user.username, "Login succeeded");
        Ok(LoginOutcome {
            username: user.username,
            session,
        })
    }

    fn logout(&self, session: &SessionId) {
        self.sessions.invalidate(session);
    }

    async fn get_profile(&self, username: &str) -> AppResult<User> {
        self.users.find_by_username(username).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn update_profile(&self, username: &str, changes: UpdateProfile) -> AppResult<User> {
        let mut user = self.users.find_by_username(username).await?.ok_or_not_found()?;

        let password_changed = match changes.password {
            Some(ref password) => {
                user.password_hash = Password::new(password)?.into_string();
                true
            }
            None => false,
        };
        if let Some(email) = changes.email {
            user.email = Some(email);
        }

        // Revoke on both sides of the store write: pre-change sessions
        // must not outlive the commit, and a login racing the write
        // against the old hash must not survive it either.
        if password_changed {
            self.sessions.revoke_all_for_user(username);
        }

        self.users.update(user.clone()).await?;

        if password_changed {
            self.sessions.revoke_all_for_user(username);
            tracing::info!(%username, "Password changed, sessions revoked");
        }

        Ok(user)
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        if !self.users.exists_by_username(username).await? {
            return Err(AppError::NotFound);
        }

        self.sessions.revoke_all_for_user(username);
        self.users.delete(username).await?;
        tracing::info!(%username, "Account deleted");
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                // internal-only signal; the response is identical to
                // the registered case
                tracing::debug!(%email, "Forgot-password request for unknown email");
                return Ok(());
            }
        };

        let token = self.tokens.issue(&user.username).await?;
        let link = self.reset_link(&token.value);

        self.dispatch_email(EmailMessage::new(
            email,
            "Reset Password",
            format!("Click the link to reset your password: {}", link),
        ));

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let username = self.tokens.consume(token).await?;

        // the account may have been deleted since the token was issued
        let mut user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        user.password_hash = Password::new(new_password)?.into_string();

        // same double revocation as update_profile
        self.sessions.revoke_all_for_user(&username);
        self.users.update(user).await?;
        self.sessions.revoke_all_for_user(&username);
        tracing::info!(%username, "Password reset completed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{InMemoryTokens, InMemoryUsers, MockUserRepository};
    use mockall::predicate::eq;
    use std::sync::Mutex as StdMutex;

    /// Mailer that records messages instead of sending them.
    #[derive(Default)]
    struct RecordingMailer {
        sent: StdMutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: EmailMessage) -> AppResult<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    struct Fixture {
        manager: AccountManager,
        sessions: Arc<SessionRegistry>,
        mailer: Arc<RecordingMailer>,
    }

    fn fixture() -> Fixture {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUsers::new());
        let sessions = Arc::new(SessionRegistry::new());
        let tokens = Arc::new(TokenService::new(Arc::new(InMemoryTokens::new())));
        let mailer = Arc::new(RecordingMailer::default());
        let manager = AccountManager::new(
            users,
            Arc::clone(&sessions),
            tokens,
            Arc::clone(&mailer) as Arc<dyn Mailer>,
            "http://localhost:3000".to_string(),
        );
        Fixture {
            manager,
            sessions,
            mailer,
        }
    }

    fn sign_up(username: &str, password: &str, email: Option<&str>) -> SignUp {
        SignUp {
            username: username.to_string(),
            password: password.to_string(),
            email: email.map(str::to_string),
        }
    }

    fn manager_over(users: MockUserRepository) -> AccountManager {
        AccountManager::new(
            Arc::new(users),
            Arc::new(SessionRegistry::new()),
            Arc::new(TokenService::new(Arc::new(InMemoryTokens::new()))),
            Arc::new(RecordingMailer::default()),
            "http://localhost:3000".to_string(),
        )
    }

    #[tokio::test]
    async fn get_profile_signals_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("ghost"))
            .returning(|_| Ok(None));

        let manager = manager_over(users);
        assert!(matches!(
            manager.get_profile("ghost").await.unwrap_err(),
            AppError::NotFound
        ));
    }

    #[tokio::test]
    async fn update_profile_of_missing_user_signals_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let manager = manager_over(users);
        let err = manager
            .update_profile("ghost", UpdateProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn registering_the_same_username_twice_conflicts() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", None))
            .await
            .unwrap();

        let err = f
            .manager
            .register(sign_up("user", "other", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_failure_is_uniform_for_unknown_user_and_bad_password() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", None))
            .await
            .unwrap();

        let unknown = f.manager.login("ghost", "pw").await.unwrap_err();
        let wrong = f.manager.login("user", "wrong").await.unwrap_err();
        assert!(matches!(unknown, AppError::Unauthorized));
        assert!(matches!(wrong, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn second_login_supersedes_the_first_session() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", None))
            .await
            .unwrap();

        let first = f.manager.login("user", "pw").await.unwrap();
        let second = f.manager.login("user", "pw").await.unwrap();

        assert!(!f.sessions.is_valid(&first.session));
        assert!(f.sessions.is_valid(&second.session));
    }

    #[tokio::test]
    async fn password_change_revokes_the_session_and_new_password_logs_in() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", None))
            .await
            .unwrap();
        let login = f.manager.login("user", "pw").await.unwrap();

        f.manager
            .update_profile(
                "user",
                UpdateProfile {
                    password: Some("updatedPassword".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert!(!f.sessions.is_valid(&login.session));
        assert!(f.manager.login("user", "pw").await.is_err());
        assert!(f.manager.login("user", "updatedPassword").await.is_ok());
    }

    #[tokio::test]
    async fn password_change_revokes_sessions_before_the_new_hash_is_committed() {
        let sessions = Arc::new(SessionRegistry::new());
        let session = sessions.create_session("user");

        let hash = Password::new("pw").unwrap().into_string();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("user"))
            .returning(move |_| Ok(Some(User::new("user".to_string(), hash.clone(), None))));
        let registry = Arc::clone(&sessions);
        users.expect_update().returning(move |_| {
            assert!(
                !registry.is_valid(&session),
                "stale session still live at commit time"
            );
            Ok(())
        });

        let manager = AccountManager::new(
            Arc::new(users),
            Arc::clone(&sessions),
            Arc::new(TokenService::new(Arc::new(InMemoryTokens::new()))),
            Arc::new(RecordingMailer::default()),
            "http://localhost:3000".to_string(),
        );

        manager
            .update_profile(
                "user",
                UpdateProfile {
                    password: Some("updatedPassword".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();
        assert!(!sessions.is_valid(&session));
    }

    #[tokio::test]
    async fn email_only_update_keeps_the_session() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", None))
            .await
            .unwrap();
        let login = f.manager.login("user", "pw").await.unwrap();

        let updated = f
            .manager
            .update_profile(
                "user",
                UpdateProfile {
                    password: None,
                    email: Some("new@domain.com".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email.as_deref(), Some("new@domain.com"));
        assert!(f.sessions.is_valid(&login.session));
    }

    #[tokio::test]
    async fn delete_revokes_sessions_and_removes_the_account() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", None))
            .await
            .unwrap();
        let login = f.manager.login("user", "pw").await.unwrap();

        f.manager.delete("user").await.unwrap();
        assert!(!f.sessions.is_valid(&login.session));
        assert!(matches!(
            f.manager.delete("user").await.unwrap_err(),
            AppError::NotFound
        ));
        assert!(f.manager.login("user", "pw").await.is_err());
    }

    #[tokio::test]
    async fn forgot_password_is_silent_for_unknown_email() {
        let f = fixture();
        f.manager.forgot_password("nobody@domain.com").await.unwrap();
        assert!(f.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn forgot_then_reset_rotates_the_password() {
        let f = fixture();
        f.manager
            .register(sign_up("user", "pw", Some("user@domain.com")))
            .await
            .unwrap();

        f.manager.forgot_password("user@domain.com").await.unwrap();

        // the reset link travels out-of-band via email; give the
        // spawned dispatch a chance to run
        for _ in 0..100 {
            if !f.mailer.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        let token = {
            let sent = f.mailer.sent.lock().unwrap();
            let body = &sent.first().expect("reset email dispatched").body;
            body.split("token=").nth(1).unwrap().to_string()
        };

        f.manager
            .reset_password(&token, "updatedPassword")
            .await
            .unwrap();

        assert!(f.manager.login("user", "pw").await.is_err());
        assert!(f.manager.login("user", "updatedPassword").await.is_ok());

        // single use
        assert!(matches!(
            f.manager.reset_password(&token, "again").await.unwrap_err(),
            AppError::TokenInvalid
        ));
    }
}
