//! Domain layer - Core business entities and logic
//!
//! Contains the account-domain models independent of transport and
//! storage concerns: the user aggregate, the password value object
//! and the password-reset token.

pub mod password;
pub mod reset_token;
pub mod user;

pub use password::Password;
pub use reset_token::ResetToken;
pub use user::{SignUp, UpdateProfile, User, UserResponse};
