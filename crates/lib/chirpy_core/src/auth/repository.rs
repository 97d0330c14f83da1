//! Persistence seams consumed by the auth core.
//!
//! The core never talks to a database directly; it goes through these traits.
//! [`PgAccounts`] and [`PgRefreshTokens`] back them with PostgreSQL, the
//! in-process variants live in [`super::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthResult;
use super::queries;
use crate::models::auth::{AccountSummary, AccountWithPassword, RefreshTokenRecord};

/// Account lookup and creation.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account and its password hash by email.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AccountWithPassword>>;

    /// Create an account. Returns `None` if the email is already registered.
    async fn create(&self, email: &str, password_hash: &str) -> AuthResult<Option<AccountSummary>>;

    /// Flag an account as upgraded. Returns `false` if the account does not exist.
    async fn mark_upgraded(&self, id: Uuid) -> AuthResult<bool>;
}

/// Refresh-token persistence primitives, keyed by token hash.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: &RefreshTokenRecord) -> AuthResult<()>;

    /// Look up a record by token hash.
    async fn find(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Set `revoked_at` if it is not already set, as a single atomic update.
    /// Returns `false` if no record exists.
    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> AuthResult<bool>;
}

/// PostgreSQL-backed [`AccountRepository`].
#[derive(Clone)]
pub struct PgAccounts {
    pool: PgPool,
}

impl PgAccounts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccounts {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AccountWithPassword>> {
        queries::find_account_by_email(&self.pool, email).await
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
    ) -> AuthResult<Option<AccountSummary>> {
        queries::create_account(&self.pool, email, password_hash).await
    }

    async fn mark_upgraded(&self, id: Uuid) -> AuthResult<bool> {
        queries::upgrade_account(&self.pool, id).await
    }
}

/// PostgreSQL-backed [`RefreshTokenRepository`].
#[derive(Clone)]
pub struct PgRefreshTokens {
    pool: PgPool,
}

impl PgRefreshTokens {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokens {
    async fn insert(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        queries::store_refresh_token(&self.pool, record).await
    }

    async fn find(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        queries::find_refresh_token(&self.pool, token_hash).await
    }

    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> AuthResult<bool> {
        queries::revoke_refresh_token(&self.pool, token_hash, at).await
    }
}
