//! Payment-provider webhooks. The service-key guard runs before these.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::PolkaWebhookRequest;

/// The only event that changes state.
const USER_UPGRADED: &str = "user.upgraded";

/// `POST /api/polka/webhooks` — apply an account upgrade.
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    Json(body): Json<PolkaWebhookRequest>,
) -> AppResult<StatusCode> {
    if body.event != USER_UPGRADED {
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = body.data.user_id;
    if !state.auth.upgrade_account(user_id).await? {
        return Err(AppError::NotFound("Couldn't find user".into()));
    }
    info!(%user_id, "account upgraded");
    Ok(StatusCode::NO_CONTENT)
}
