//! Infrastructure layer - External collaborators
//!
//! Durable storage and email delivery are external to the core
//! subsystem; this module defines their trait seams and ships the
//! in-memory / logging implementations the server and tests run on.

pub mod mailer;
pub mod repositories;

pub use mailer::{EmailMessage, LogMailer, Mailer};
pub use repositories::{InMemoryTokens, InMemoryUsers, TokenRepository, UserRepository};
