//! Authorization policy.
//!
//! One explicit decision function evaluated at the top of every
//! protected handler, instead of per-endpoint checks scattered through
//! the routing layer. Public operations (sign-up, login, password
//! reset) never reach this function; the auth middleware has already
//! rejected unauthenticated requests to protected routes with 401.

use std::collections::BTreeSet;

use crate::config::ROLE_ADMIN;
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::services::SessionId;

/// The identity behind an authenticated request.
#[derive(Clone, Debug)]
pub struct Principal {
    pub username: String,
    pub authorities: BTreeSet<String>,
    /// Session the request authenticated with; `None` for per-request
    /// basic credentials.
    pub session: Option<SessionId>,
}

impl Principal {
    pub fn from_user(user: &User, session: Option<SessionId>) -> Self {
        Self {
            username: user.username.clone(),
            authorities: user.authorities.clone(),
            session,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.authorities.contains(ROLE_ADMIN)
    }
}

/// A protected operation on a target resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Admin-only listing of every account
    ListAllUsers,
    /// Self-service profile reads and mutations
    ViewProfile { target: String },
    UpdateProfile { target: String },
    DeleteProfile { target: String },
}

/// Decide whether `principal` may perform `action`.
///
/// Admin paths require `ROLE_ADMIN`; self-service paths require the
/// target username to equal the principal's. Mismatches are `Forbidden`
/// uniformly, whether or not the target exists, so responses carry no
/// existence signal beyond what the caller is entitled to.
pub fn authorize(principal: &Principal, action: &Action) -> AppResult<()> {
    match action {
        Action::ListAllUsers => {
            if principal.is_admin() {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        Action::ViewProfile { target }
        | Action::UpdateProfile { target }
        | Action::DeleteProfile { target } => {
            if *target == principal.username {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ROLE_USER;

    fn principal(username: &str, roles: &[&str]) -> Principal {
        Principal {
            username: username.to_string(),
            authorities: roles.iter().map(|r| r.to_string()).collect(),
            session: None,
        }
    }

    #[test]
    fn admin_listing_requires_the_admin_role() {
        let admin = principal("admin", &[ROLE_ADMIN, ROLE_USER]);
        let user = principal("user", &[ROLE_USER]);

        assert!(authorize(&admin, &Action::ListAllUsers).is_ok());
        assert!(matches!(
            authorize(&user, &Action::ListAllUsers).unwrap_err(),
            AppError::Forbidden
        ));
    }

    #[test]
    fn self_service_requires_a_matching_target() {
        let user = principal("user", &[ROLE_USER]);

        for action in [
            Action::ViewProfile { target: "user".into() },
            Action::UpdateProfile { target: "user".into() },
            Action::DeleteProfile { target: "user".into() },
        ] {
            assert!(authorize(&user, &action).is_ok());
        }

        assert!(matches!(
            authorize(&user, &Action::ViewProfile { target: "other".into() }).unwrap_err(),
            AppError::Forbidden
        ));
    }

    #[test]
    fn admin_role_does_not_grant_access_to_other_profiles() {
        // matches the reference behavior: admins reading someone else's
        // profile get 403, not a pass-through
        let admin = principal("admin", &[ROLE_ADMIN, ROLE_USER]);
        assert!(matches!(
            authorize(&admin, &Action::ViewProfile { target: "user".into() }).unwrap_err(),
            AppError::Forbidden
        ));
    }

    #[test]
    fn forbidden_is_uniform_for_absent_and_foreign_targets() {
        let user = principal("user", &[ROLE_USER]);
        let foreign = authorize(&user, &Action::ViewProfile { target: "other".into() });
        let absent = authorize(&user, &Action::ViewProfile { target: "ghost".into() });
        assert!(matches!(foreign.unwrap_err(), AppError::Forbidden));
        assert!(matches!(absent.unwrap_err(), AppError::Forbidden));
    }
}
