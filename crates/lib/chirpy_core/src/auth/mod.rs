//! Authentication and authorization logic.
//!
//! Provides password hashing, access-token management, header credential
//! parsing and the refresh-token lifecycle, shared by `chirpy_api`.

pub mod credentials;
pub mod jwt;
pub mod memory;
pub mod password;
pub mod queries;
pub mod refresh_tokens;
pub mod repository;

use thiserror::Error;

/// Convenience alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors.
///
/// The variants keep every internal distinction for logging. Callers facing
/// end users collapse them with [`AuthError::class`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credential")]
    MissingCredential,

    #[error("Malformed credential: {0}")]
    MalformedCredential(&'static str),

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Access token expired")]
    TokenExpired,

    #[error("Access token signature invalid")]
    InvalidSignature,

    #[error("Malformed access token: {0}")]
    MalformedToken(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Refresh token revoked")]
    RefreshTokenRevoked,

    #[error("Service key mismatch")]
    ServiceKeyMismatch,

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token encoding error: {0}")]
    TokenEncoding(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Externally meaningful failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Wrong password, bad/expired/revoked token, malformed header.
    CredentialInvalid,
    /// Unknown account or refresh token.
    NotFound,
    /// Persistence unavailable.
    Storage,
    /// The check itself could not run (hashing or signing failure).
    Hashing,
    /// Rejected input outside the credential checks.
    Validation,
}

impl AuthError {
    /// Map this error into its failure class.
    pub fn class(&self) -> FailureClass {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential(_)
            | AuthError::PasswordMismatch
            | AuthError::MalformedHash
            | AuthError::TokenExpired
            | AuthError::InvalidSignature
            | AuthError::MalformedToken(_)
            | AuthError::RefreshTokenExpired
            | AuthError::RefreshTokenRevoked
            | AuthError::ServiceKeyMismatch => FailureClass::CredentialInvalid,
            AuthError::AccountNotFound | AuthError::RefreshTokenNotFound => FailureClass::NotFound,
            AuthError::Hashing(_) | AuthError::TokenEncoding(_) => FailureClass::Hashing,
            AuthError::Storage(_) => FailureClass::Storage,
            AuthError::Validation(_) => FailureClass::Validation,
        }
    }

    /// True when the failure should read as "unauthorized" to the caller.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.class(),
            FailureClass::CredentialInvalid | FailureClass::NotFound
        )
    }
}
