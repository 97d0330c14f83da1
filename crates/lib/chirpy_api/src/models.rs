//! Request and response bodies.

use chirpy_core::models::auth::AccountSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `POST /api/users` body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/login` body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime; may only shorten the default.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// `POST /api/login` response: the account plus a fresh token pair.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub account: AccountSummary,
    pub token: String,
    pub refresh_token: String,
}

/// `POST /api/refresh` response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// `GET /api/session` response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
}

/// `POST /api/polka/webhooks` body.
#[derive(Debug, Deserialize)]
pub struct PolkaWebhookRequest {
    pub event: String,
    pub data: PolkaWebhookData,
}

#[derive(Debug, Deserialize)]
pub struct PolkaWebhookData {
    pub user_id: Uuid,
}
