//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use chirpy_core::auth::memory::{MemoryAccounts, MemoryRefreshTokens};
use chirpy_core::auth::repository::{PgAccounts, PgRefreshTokens};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health, session, webhooks};
use crate::services::auth::AuthService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential and session flows.
    pub auth: AuthService,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: ApiConfig) -> Self {
        let auth = AuthService::new(
            Arc::new(PgAccounts::new(pool.clone())),
            Arc::new(PgRefreshTokens::new(pool)),
            &config,
        );
        Self { auth, config }
    }

    /// State backed by in-process stores. Nothing survives a restart.
    pub fn ephemeral(config: ApiConfig) -> Self {
        let auth = AuthService::new(
            Arc::new(MemoryAccounts::new()),
            Arc::new(MemoryRefreshTokens::new()),
            &config,
        );
        Self { auth, config }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `chirpy_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    chirpy_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/healthz", get(health::readiness))
        .route("/api/users", post(auth::register_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler));

    // Protected routes (require an access token)
    let protected = Router::new()
        .route("/api/session", get(session::session_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Trusted server-to-server routes (require the service key)
    let service = Router::new()
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_service_key,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(service)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
