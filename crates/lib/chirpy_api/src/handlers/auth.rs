//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest};
use chirpy_core::models::auth::AccountSummary;

/// `POST /api/users` — create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountSummary>)> {
    let account = state.auth.register(&body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `POST /api/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .auth
        .login(&body.email, &body.password, body.expires_in_seconds)
        .await?;
    Ok(Json(LoginResponse {
        account: outcome.account,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// `POST /api/refresh` — exchange a bearer refresh token for a new access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<RefreshResponse>> {
    let token = state.auth.refresh(&headers).await?;
    Ok(Json(RefreshResponse { token }))
}

/// `POST /api/revoke` — revoke the bearer refresh token.
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    state.auth.revoke_session(&headers).await?;
    Ok(StatusCode::NO_CONTENT)
}
