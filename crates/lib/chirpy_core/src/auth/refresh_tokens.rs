//! Refresh token lifecycle: issue, validate, revoke.
//!
//! Refresh tokens are opaque random strings. Only their SHA-256 digest is
//! persisted, so a leaked table cannot be replayed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use super::repository::RefreshTokenRepository;
use super::{AuthError, AuthResult};
use crate::models::auth::RefreshTokenRecord;

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 60;

/// Random bytes per refresh token (hex-encoded to twice this length).
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random refresh token (64 hex chars).
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Server-side record keeper for refresh tokens.
#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
}

impl RefreshTokenStore {
    /// Store with the default 60-day lifetime.
    pub fn new(repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self::with_ttl(repo, Duration::days(REFRESH_TOKEN_EXPIRY_DAYS))
    }

    pub fn with_ttl(repo: Arc<dyn RefreshTokenRepository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    /// Issue a new refresh token for `user_id`. Returns the plaintext token.
    pub async fn issue(&self, user_id: Uuid) -> AuthResult<String> {
        self.issue_at(user_id, Utc::now()).await
    }

    /// Issue a new refresh token as if at `now`.
    pub async fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AuthResult<String> {
        let token = generate_refresh_token();
        let record = RefreshTokenRecord {
            token_hash: hash_refresh_token(&token),
            user_id,
            expires_at: now + self.ttl,
            revoked_at: None,
        };
        self.repo.insert(&record).await?;
        info!(%user_id, expires_at = %record.expires_at, "issued refresh token");
        Ok(token)
    }

    /// Validate a refresh token, returning the owning account.
    pub async fn validate(&self, token: &str) -> AuthResult<Uuid> {
        self.validate_at(token, Utc::now()).await
    }

    /// Validate a refresh token against an explicit `now`.
    ///
    /// Revocation is checked first and on its own: a revoked token is
    /// rejected regardless of its expiry.
    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Uuid> {
        let record = self
            .repo
            .find(&hash_refresh_token(token))
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)?;

        if record.revoked_at.is_some() {
            debug!(user_id = %record.user_id, "refresh token revoked");
            return Err(AuthError::RefreshTokenRevoked);
        }
        if now >= record.expires_at {
            debug!(user_id = %record.user_id, "refresh token expired");
            return Err(AuthError::RefreshTokenExpired);
        }
        Ok(record.user_id)
    }

    /// Revoke a refresh token. Revoking twice is not an error.
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        if self
            .repo
            .revoke(&hash_refresh_token(token), Utc::now())
            .await?
        {
            info!("revoked refresh token");
            Ok(())
        } else {
            Err(AuthError::RefreshTokenNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::MemoryRefreshTokens;

    fn store() -> (Arc<MemoryRefreshTokens>, RefreshTokenStore) {
        let repo = Arc::new(MemoryRefreshTokens::new());
        (repo.clone(), RefreshTokenStore::new(repo))
    }

    #[test]
    fn tokens_are_long_random_hex() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn issued_token_is_stored_hashed() {
        let (repo, store) = store();
        let user_id = Uuid::new_v4();
        assert!(repo.is_empty());
        let token = store.issue(user_id).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert!(repo.find(&token).await.unwrap().is_none());
        let record = repo.find(&hash_refresh_token(&token)).await.unwrap().unwrap();
        assert_eq!(record.user_id, user_id);
        assert!(record.revoked_at.is_none());
    }

    #[tokio::test]
    async fn issued_token_validates_until_expiry() {
        let (_, store) = store();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = store.issue_at(user_id, now).await.unwrap();

        assert_eq!(store.validate_at(&token, now).await.unwrap(), user_id);
        let last_valid = now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS) - Duration::seconds(1);
        assert_eq!(store.validate_at(&token, last_valid).await.unwrap(), user_id);
        assert!(matches!(
            store
                .validate_at(&token, now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS))
                .await,
            Err(AuthError::RefreshTokenExpired)
        ));
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (_, store) = store();
        assert!(matches!(
            store.validate("nope").await,
            Err(AuthError::RefreshTokenNotFound)
        ));
        assert!(matches!(
            store.revoke("nope").await,
            Err(AuthError::RefreshTokenNotFound)
        ));
    }

    #[tokio::test]
    async fn revoked_token_never_validates_again() {
        let (_, store) = store();
        let token = store.issue(Uuid::new_v4()).await.unwrap();

        store.revoke(&token).await.unwrap();
        assert!(matches!(
            store.validate(&token).await,
            Err(AuthError::RefreshTokenRevoked)
        ));
        // Second revoke is a no-op.
        store.revoke(&token).await.unwrap();
        assert!(matches!(
            store.validate(&token).await,
            Err(AuthError::RefreshTokenRevoked)
        ));
    }

    #[tokio::test]
    async fn revoked_wins_over_expired() {
        let (_, store) = store();
        let now = Utc::now();
        let token = store.issue_at(Uuid::new_v4(), now).await.unwrap();
        store.revoke(&token).await.unwrap();
        assert!(matches!(
            store.validate_at(&token, now + Duration::days(365)).await,
            Err(AuthError::RefreshTokenRevoked)
        ));
    }

    #[tokio::test]
    async fn revoking_one_session_keeps_others() {
        let (_, store) = store();
        let user_id = Uuid::new_v4();
        let laptop = store.issue(user_id).await.unwrap();
        let phone = store.issue(user_id).await.unwrap();

        store.revoke(&laptop).await.unwrap();
        assert_eq!(store.validate(&phone).await.unwrap(), user_id);
    }
}
