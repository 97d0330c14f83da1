//! Session introspection.

use axum::{Extension, Json};

use crate::middleware::auth::AuthenticatedAccount;
use crate::models::SessionResponse;

/// `GET /api/session` — the account behind the presented access token.
pub async fn session_handler(
    Extension(AuthenticatedAccount(id)): Extension<AuthenticatedAccount>,
) -> Json<SessionResponse> {
    Json(SessionResponse { id })
}
