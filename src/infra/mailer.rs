//! Outbound email delivery.
//!
//! Email is an external collaborator: the service only needs a
//! "send message" capability. In development mode (no SMTP settings)
//! messages are logged instead of sent.

use std::env;

use async_trait::async_trait;

use crate::errors::AppResult;

/// A message handed to the delivery backend.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Email delivery seam. Dispatch failures are the caller's to log;
/// they never roll back the operation that produced the message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// SMTP settings from the environment.
struct SmtpConfig {
    host: Option<String>,
    from: String,
}

impl SmtpConfig {
    fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").ok(),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@example.com".to_string()),
        }
    }

    fn is_configured(&self) -> bool {
        self.host.is_some()
    }
}

/// Default mailer: logs messages, warning when SMTP is not configured.
#[derive(Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let config = SmtpConfig::from_env();

        tracing::info!(
            to = %message.to,
            from = %config.from,
            subject = %message.subject,
            "Dispatching email"
        );

        if !config.is_configured() {
            tracing::warn!("SMTP not configured - logging email instead of sending");
        }

        tracing::info!(
            "=== EMAIL ===\nFrom: {}\nTo: {}\nSubject: {}\nBody:\n{}\n=============",
            config.from,
            message.to,
            message.subject,
            message.body
        );

        Ok(())
    }
}
