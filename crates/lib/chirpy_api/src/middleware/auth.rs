//! Authentication middleware — bearer access tokens for end users and the
//! service key for trusted webhook callers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;

/// Account ID stored in request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAccount(pub Uuid);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedAccount` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let account_id = state.auth.authorize(&parts.headers).await?;
    parts.extensions.insert(AuthenticatedAccount(account_id));
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Axum middleware: requires `Authorization: ApiKey <key>` matching the
/// configured service key. Failures look exactly like any other 401.
pub async fn require_service_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.auth.verify_service_key(request.headers())?;
    Ok(next.run(request).await)
}
