//! Authentication domain models.
//!
//! These are internal domain models, distinct from the wire DTOs in `chirpy_api`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

/// Account with its stored password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct AccountWithPassword {
    pub account: AccountSummary,
    pub password_hash: String,
}

/// Server-side record of an issued refresh token.
///
/// `token_hash` is the SHA-256 hex digest of the opaque token handed to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer, always `chirpy`.
    pub iss: String,
    /// Subject: account ID.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}
