//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod token_repository;
mod user_repository;

pub use token_repository::{InMemoryTokens, TokenRepository};
pub use user_repository::{InMemoryUsers, UserRepository};

// Export mocks for unit tests
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
