//! Authentication middleware.
//!
//! Resolves the acting principal from either a bearer session token
//! (issued by login) or per-request basic credentials, and injects it
//! into the request extensions. Requests that present neither are
//! rejected with 401 before any handler runs.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::{AppError, AppResult};
use crate::services::{Principal, SessionId};

/// Require an authenticated principal on every request passing through.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolve_principal(&state, request.headers()).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Session token first, then basic credentials.
async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> AppResult<Principal> {
    if let Some(token) = bearer_token(headers) {
        let id: SessionId = token.parse().map_err(|_| AppError::Unauthorized)?;
        let username = state.sessions.resolve(&id).ok_or(AppError::Unauthorized)?;

        // A stale registry entry for a user deleted through another
        // path must not authenticate.
        let user = state
            .users
            .find_by_username(&username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        return Ok(Principal::from_user(&user, Some(id)));
    }

    if let Some(Authorization(basic)) = headers.typed_get::<Authorization<Basic>>() {
        let user = state
            .accounts
            .authenticate(basic.username(), basic.password())
            .await?;
        return Ok(Principal::from_user(&user, None));
    }

    Err(AppError::Unauthorized)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
}
