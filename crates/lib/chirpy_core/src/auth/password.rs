//! Password hashing via bcrypt.
//!
//! bcrypt only reads the first 72 bytes of its input, so longer passwords are
//! refused instead of silently truncated.

use std::sync::OnceLock;

use bcrypt::BcryptError;

use super::{AuthError, AuthResult};

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password with bcrypt (salted, cost [`BCRYPT_COST`]).
pub fn hash_password(password: &str) -> AuthResult<String> {
    hash_password_with_cost(password, BCRYPT_COST)
}

/// Hash a password with an explicit bcrypt cost.
pub fn hash_password_with_cost(password: &str, cost: u32) -> AuthResult<String> {
    bcrypt::non_truncating_hash(password, cost).map_err(|e| match e {
        BcryptError::Truncation(_) => AuthError::Validation("Password is too long".into()),
        other => AuthError::Hashing(format!("bcrypt hash: {other}")),
    })
}

/// Verify a password against a bcrypt hash.
///
/// A wrong password is [`AuthError::PasswordMismatch`]; a hash bcrypt cannot
/// parse is [`AuthError::MalformedHash`]. A password too long to have been
/// hashed can never match.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<()> {
    match bcrypt::non_truncating_verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) | Err(BcryptError::Truncation(_)) => Err(AuthError::PasswordMismatch),
        Err(_) => Err(AuthError::MalformedHash),
    }
}

/// Fixed hash checked when no account matches, so a miss costs as much as a
/// wrong password. `None` if it could not be computed.
pub fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("chirpy-placeholder-password").ok())
        .as_deref()
}

/// Spend a full verification on [`placeholder_hash`]. Always a mismatch for callers.
pub fn verify_against_placeholder(password: &str) -> AuthError {
    if let Some(hash) = placeholder_hash() {
        let _ = bcrypt::verify(password, hash);
    }
    AuthError::AccountNotFound
}
