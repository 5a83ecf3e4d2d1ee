//! Profile resources: self-service reads and mutations, plus the
//! admin-only listing. Each handler evaluates the authorization policy
//! before touching the orchestrator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch},
    Extension, Router,
};

use crate::api::AppState;
use crate::domain::{UpdateProfile, UserResponse};
use crate::errors::AppResult;
use crate::services::{authorize, Action, Principal};

/// Routes requiring an authenticated principal
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/all-users", get(all_users))
        .route("/:username/profile", get(get_profile))
        .route("/:username/update", patch(update_profile))
        .route("/:username/delete", delete(delete_profile))
}

/// Admin-only listing of every account as `{username, email}` pairs.
async fn all_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<UserResponse>>> {
    authorize(&principal, &Action::ListAllUsers)?;

    let users = state.accounts.list_users().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UserResponse>> {
    authorize(&principal, &Action::ViewProfile { target: username.clone() })?;

    let user = state.accounts.get_profile(&username).await?;
    Ok(Json(user.into()))
}

/// Apply profile changes; a password change revokes the caller's
/// sessions, so the 200 response is the last one the old session sees.
async fn update_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(principal): Extension<Principal>,
    Json(changes): Json<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    authorize(&principal, &Action::UpdateProfile { target: username.clone() })?;

    let user = state.accounts.update_profile(&username, changes).await?;
    Ok(Json(user.into()))
}

async fn delete_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(principal): Extension<Principal>,
) -> AppResult<StatusCode> {
    authorize(&principal, &Action::DeleteProfile { target: username.clone() })?;

    state.accounts.delete(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
