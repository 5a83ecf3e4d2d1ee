//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Authorization header prefix for bearer session tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Password-reset token lifetime in seconds (10 minutes)
pub const DEFAULT_RESET_TOKEN_TTL_SECS: i64 = 600;

// =============================================================================
// Roles
// =============================================================================

/// Default role granted to every new account
pub const ROLE_USER: &str = "ROLE_USER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default externally visible base URL (used in password-reset links)
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

// =============================================================================
// Routing
// =============================================================================

/// Root path all account endpoints are nested under
pub const HOME_PATH: &str = "/home";

/// Path of the reset-password endpoint, relative to the home root
pub const RESET_PASSWORD_PATH: &str = "/reset-password";

// =============================================================================
// Account bootstrap
// =============================================================================

/// Default username for the seeded administrator account
pub const DEFAULT_ADMIN_USERNAME: &str = "defaultAdmin";

/// Default password for the seeded administrator account (dev only)
pub const DEFAULT_ADMIN_PASSWORD: &str = "defaultAdminPassword";

/// Default email for the seeded administrator account
pub const DEFAULT_ADMIN_EMAIL: &str = "defaultAdmin@domain.com";

/// Username of the seeded demonstration account
pub const DEFAULT_USER_USERNAME: &str = "defaultUser";

/// Password of the seeded demonstration account
pub const DEFAULT_USER_PASSWORD: &str = "defaultUserPassword";

/// Email of the seeded demonstration account
pub const DEFAULT_USER_EMAIL: &str = "defaultUser@domain.com";
