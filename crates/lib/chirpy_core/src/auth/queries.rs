//! Auth-related database queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthResult;
use crate::models::auth::{AccountSummary, AccountWithPassword, RefreshTokenRecord};

type AccountRow = (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool);

fn summary_from_row(row: AccountRow) -> AccountSummary {
    let (id, email, created_at, updated_at, is_chirpy_red) = row;
    AccountSummary {
        id,
        email,
        created_at,
        updated_at,
        is_chirpy_red,
    }
}

/// Fetch an account with its password hash by email.
pub async fn find_account_by_email(
    pool: &PgPool,
    email: &str,
) -> AuthResult<Option<AccountWithPassword>> {
    let row = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool, String)>(
        "SELECT id, email, created_at, updated_at, is_chirpy_red, hashed_password \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, email, created_at, updated_at, is_chirpy_red, password_hash)| AccountWithPassword {
            account: summary_from_row((id, email, created_at, updated_at, is_chirpy_red)),
            password_hash,
        },
    ))
}

/// Create an account, returning `None` when the email is already taken.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> AuthResult<Option<AccountSummary>> {
    let row = sqlx::query_as::<_, AccountRow>(
        "INSERT INTO users (email, hashed_password) VALUES ($1, $2) \
         ON CONFLICT (email) DO NOTHING \
         RETURNING id, email, created_at, updated_at, is_chirpy_red",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(summary_from_row))
}

/// Mark an account as upgraded. Returns whether the account exists.
pub async fn upgrade_account(pool: &PgPool, id: Uuid) -> AuthResult<bool> {
    let result = sqlx::query(
        "UPDATE users SET is_chirpy_red = true, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Store a refresh token record.
pub async fn store_refresh_token(pool: &PgPool, record: &RefreshTokenRecord) -> AuthResult<()> {
    sqlx::query(
        "INSERT INTO refresh_tokens (token_hash, user_id, expires_at, revoked_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(&record.token_hash)
    .bind(record.user_id)
    .bind(record.expires_at)
    .bind(record.revoked_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Find a refresh token record by hash, whatever its state.
pub async fn find_refresh_token(
    pool: &PgPool,
    token_hash: &str,
) -> AuthResult<Option<RefreshTokenRecord>> {
    let row = sqlx::query_as::<_, (String, Uuid, DateTime<Utc>, Option<DateTime<Utc>>)>(
        "SELECT token_hash, user_id, expires_at, revoked_at \
         FROM refresh_tokens WHERE token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(token_hash, user_id, expires_at, revoked_at)| RefreshTokenRecord {
            token_hash,
            user_id,
            expires_at,
            revoked_at,
        },
    ))
}

/// Revoke a refresh token by hash. An existing revocation time is kept.
/// Returns whether the token exists.
pub async fn revoke_refresh_token(
    pool: &PgPool,
    token_hash: &str,
    at: DateTime<Utc>,
) -> AuthResult<bool> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = COALESCE(revoked_at, $2) \
         WHERE token_hash = $1",
    )
    .bind(token_hash)
    .bind(at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
