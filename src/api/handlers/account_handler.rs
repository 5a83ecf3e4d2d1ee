//! Account entry points: sign-up, login/logout and the
//! forgot/reset-password flow.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Extension, Router,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::HOME_PATH;
use crate::domain::SignUp;
use crate::errors::{AppError, AppResult};
use crate::services::Principal;

/// Location of a user's profile resource.
fn profile_location(username: &str) -> String {
    format!("{}/{}/profile", HOME_PATH, username)
}

/// Session handed to the client after login; presented back as
/// `Authorization: Bearer <session_token>`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_token: String,
    pub token_type: &'static str,
}

/// Forgot-password request payload
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Reset-password body; the token arrives as a query parameter
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetTokenQuery {
    pub token: String,
}

/// Routes that require no authentication
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/login", post(login))
        .route("/forget-password", post(forget_password))
        .route("/reset-password", post(reset_password))
}

/// Routes that require an authenticated principal
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/logout", post(logout))
}

/// Register a new account; 201 with a Location header pointing at the
/// profile. A taken username surfaces as 400, matching the endpoint's
/// documented contract.
async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUp>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1])> {
    let user = state.accounts.register(payload).await.map_err(|e| match e {
        AppError::Conflict(_) => AppError::validation("Username already exists"),
        other => other,
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, profile_location(&user.username))],
    ))
}

/// Log in with basic credentials; opens a session that supersedes any
/// previous one for the same user, and points the client at its
/// profile.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<([(header::HeaderName, String); 1], Json<SessionResponse>)> {
    let Authorization(basic) = headers
        .typed_get::<Authorization<Basic>>()
        .ok_or(AppError::Unauthorized)?;

    let outcome = state.accounts.login(basic.username(), basic.password()).await?;

    Ok((
        [(header::LOCATION, profile_location(&outcome.username))],
        Json(SessionResponse {
            session_token: outcome.session.to_string(),
            token_type: "Bearer",
        }),
    ))
}

/// Destroy the presented session. Basic-auth requests carry no session;
/// either way the response is 204.
async fn logout(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> StatusCode {
    if let Some(session) = principal.session {
        state.accounts.logout(&session);
    }
    StatusCode::NO_CONTENT
}

/// Start the reset flow. The response is 200 whether or not the email
/// is registered; the lookup result stays internal.
async fn forget_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    state.accounts.forgot_password(&payload.email).await?;
    Ok(StatusCode::OK)
}

/// Complete the reset flow with a token from the emailed link.
async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<ResetTokenQuery>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .accounts
        .reset_password(&query.token, &payload.password)
        .await?;
    Ok(StatusCode::OK)
}
