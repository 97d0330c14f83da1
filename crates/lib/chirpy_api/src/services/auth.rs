//! Authentication service — login, refresh and revocation flows delegating
//! to `chirpy_core::auth`.
//!
//! Every method keeps the internal [`AuthError`] so callers can log the
//! precise reason; the HTTP layer collapses it through `AppError`.

use std::sync::Arc;

use axum::http::HeaderMap;
use chirpy_core::auth::credentials::{extract_bearer, verify_service_key_header};
use chirpy_core::auth::jwt::{effective_ttl, generate_access_token, verify_access_token};
use chirpy_core::auth::password::{hash_password, verify_against_placeholder, verify_password};
use chirpy_core::auth::refresh_tokens::RefreshTokenStore;
use chirpy_core::auth::repository::{AccountRepository, RefreshTokenRepository};
use chirpy_core::auth::{AuthError, AuthResult};
use chirpy_core::models::auth::AccountSummary;
use tracing::info;
use uuid::Uuid;

use crate::config::ApiConfig;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountSummary,
}

/// Orchestrates password checks, access tokens and refresh tokens.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    refresh_tokens: RefreshTokenStore,
    jwt_secret: Arc<[u8]>,
    service_key: Arc<str>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        config: &ApiConfig,
    ) -> Self {
        Self {
            accounts,
            refresh_tokens: RefreshTokenStore::new(refresh_tokens),
            jwt_secret: Arc::from(config.jwt_secret.as_bytes()),
            service_key: Arc::from(config.polka_key.as_str()),
        }
    }

    /// Register a new account.
    pub async fn register(&self, email: &str, password: &str) -> AuthResult<AccountSummary> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required".into()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }

        let password = password.to_string();
        let pw_hash = run_blocking(move || hash_password(&password)).await?;

        let account = self
            .accounts
            .create(email, &pw_hash)
            .await?
            .ok_or_else(|| AuthError::Validation("Email already registered".into()))?;
        info!(user_id = %account.id, "registered account");
        Ok(account)
    }

    /// Authenticate with email + password and open a session.
    ///
    /// `requested_ttl_secs` may shorten the access token lifetime, never extend it.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl_secs: Option<i64>,
    ) -> AuthResult<LoginOutcome> {
        let found = self.accounts.find_by_email(normalize_email(email)).await?;
        let password = password.to_string();
        let Some(found) = found else {
            return run_blocking(move || Err(verify_against_placeholder(&password))).await;
        };

        let pw_hash = found.password_hash;
        run_blocking(move || verify_password(&password, &pw_hash)).await?;

        let account = found.account;
        let access_token = generate_access_token(
            account.id,
            &self.jwt_secret,
            effective_ttl(requested_ttl_secs),
        )?;
        let refresh_token = self.refresh_tokens.issue(account.id).await?;

        info!(user_id = %account.id, "login succeeded");
        Ok(LoginOutcome {
            access_token,
            refresh_token,
            account,
        })
    }

    /// Resolve the account behind `Authorization: Bearer <access token>`.
    pub async fn authorize(&self, headers: &HeaderMap) -> AuthResult<Uuid> {
        let token = extract_bearer(headers)?;
        verify_access_token(&token, &self.jwt_secret)
    }

    /// Mint a fresh access token from `Authorization: Bearer <refresh token>`.
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh(&self, headers: &HeaderMap) -> AuthResult<String> {
        let token = extract_bearer(headers)?;
        let user_id = self.refresh_tokens.validate(&token).await?;
        generate_access_token(user_id, &self.jwt_secret, effective_ttl(None))
    }

    /// Revoke the refresh token in `Authorization: Bearer <refresh token>`.
    pub async fn revoke_session(&self, headers: &HeaderMap) -> AuthResult<()> {
        let token = extract_bearer(headers)?;
        self.refresh_tokens.revoke(&token).await
    }

    /// Check `Authorization: ApiKey <key>` against the configured key.
    pub fn verify_service_key(&self, headers: &HeaderMap) -> AuthResult<()> {
        verify_service_key_header(headers, &self.service_key)
    }

    /// Flag an account as upgraded. Returns `false` if it does not exist.
    pub async fn upgrade_account(&self, user_id: Uuid) -> AuthResult<bool> {
        self.accounts.mark_upgraded(user_id).await
    }
}

/// Emails are stored and looked up without surrounding whitespace.
fn normalize_email(email: &str) -> &str {
    email.trim()
}

/// Run CPU-heavy credential work off the async executor.
async fn run_blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Hashing(format!("blocking task failed: {e}")))?
}
