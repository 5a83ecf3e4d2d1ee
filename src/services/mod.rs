//! Service layer - Application use cases and business logic
//!
//! The five account-subsystem components live here: the session
//! registry, the token service, the authorization policy and the
//! account lifecycle orchestrator (the credential store sits in
//! `infra::repositories`).

pub mod account_service;
pub mod policy;
pub mod session_registry;
pub mod token_service;

pub use account_service::{AccountManager, AccountService, LoginOutcome};
pub use policy::{authorize, Action, Principal};
pub use session_registry::{SessionId, SessionRegistry};
pub use token_service::TokenService;
