//! Account Service - user-account management API
//!
//! Registration, profile read/update/delete, credential-based login
//! with single-active-session enforcement, and a forgot/reset-password
//! flow built on expiring one-time tokens.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities (user, password, reset token)
//! - **services**: Session registry, token service, authorization
//!   policy and the account lifecycle orchestrator
//! - **infra**: External collaborators (credential store, mailer)
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User};
pub use errors::{AppError, AppResult};
