//! JWT access token generation and verification.
//!
//! Tokens are HS256-signed with a caller-supplied secret and carry exactly
//! `{iss, sub, iat, exp}`. Validity depends only on the signature and
//! `now < exp`; no server-side state is consulted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{AuthError, AuthResult};
use crate::models::auth::TokenClaims;

/// Issuer stamped into every access token.
pub const ISSUER: &str = "chirpy";

/// Default access token lifetime: 1 hour.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Resolve the lifetime for a new access token.
///
/// A requested lifetime is honoured only when it is positive and shorter than
/// the default; anything else falls back to the default.
pub fn effective_ttl(requested_secs: Option<i64>) -> Duration {
    match requested_secs {
        Some(secs) if secs > 0 && secs < ACCESS_TOKEN_EXPIRY_SECS => Duration::seconds(secs),
        _ => Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS),
    }
}

/// Generate a signed JWT access token for `subject`, valid for `ttl` from now.
pub fn generate_access_token(subject: Uuid, secret: &[u8], ttl: Duration) -> AuthResult<String> {
    generate_access_token_at(subject, secret, ttl, Utc::now())
}

/// Generate a signed JWT access token as if issued at `issued_at`.
pub fn generate_access_token_at(
    subject: Uuid,
    secret: &[u8],
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> AuthResult<String> {
    let claims = TokenClaims {
        iss: ISSUER.to_string(),
        sub: subject.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenEncoding(format!("jwt encode: {e}")))
}

/// Verify a JWT access token, returning the subject on success.
pub fn verify_access_token(token: &str, secret: &[u8]) -> AuthResult<Uuid> {
    verify_access_token_at(token, secret, Utc::now())
}

/// Verify a JWT access token against an explicit `now`.
pub fn verify_access_token_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> AuthResult<Uuid> {
    let claims = decode_claims(token, secret)?;
    if now.timestamp() >= claims.exp {
        return Err(AuthError::TokenExpired);
    }
    Uuid::parse_str(&claims.sub)
        .map_err(|e| AuthError::MalformedToken(format!("subject is not a UUID: {e}")))
}

/// Check the signature and claim shape. Expiry is checked by the caller with
/// a strict comparison, so the library's leeway-based check is disabled.
fn decode_claims(token: &str, secret: &[u8]) -> AuthResult<TokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"your-test-secret";

    fn claims_of(token: &str) -> TokenClaims {
        decode_claims(token, SECRET).unwrap()
    }

    #[test]
    fn issued_token_validates_to_subject() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, SECRET, Duration::hours(1)).unwrap();
        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(verify_access_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn claims_carry_issuer_and_timestamps() {
        let user_id = Uuid::new_v4();
        let issued_at = Utc::now();
        let token =
            generate_access_token_at(user_id, SECRET, Duration::seconds(90), issued_at).unwrap();
        let claims = claims_of(&token);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp, issued_at.timestamp() + 90);
    }

    #[test]
    fn token_expires_exactly_at_exp() {
        let user_id = Uuid::new_v4();
        let issued_at = Utc::now();
        let ttl = Duration::seconds(30);
        let token = generate_access_token_at(user_id, SECRET, ttl, issued_at).unwrap();

        let just_before = issued_at + Duration::seconds(29);
        assert_eq!(
            verify_access_token_at(&token, SECRET, just_before).unwrap(),
            user_id
        );
        assert!(matches!(
            verify_access_token_at(&token, SECRET, issued_at + ttl),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn already_expired_token_is_rejected() {
        let token = generate_access_token(Uuid::new_v4(), SECRET, -Duration::hours(1)).unwrap();
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn wrong_secret_is_signature_error() {
        let token = generate_access_token(Uuid::new_v4(), b"secret", Duration::hours(1)).unwrap();
        assert!(matches!(
            verify_access_token(&token, b"invalid-secret"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            verify_access_token("not.a.jwt", SECRET),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            verify_access_token("", SECRET),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn non_uuid_subject_is_malformed() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: ISSUER.into(),
            sub: "not-a-uuid".into(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn foreign_issuer_is_malformed() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: "someone-else".into(),
            sub: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn requested_ttl_only_shortens() {
        assert_eq!(effective_ttl(Some(30)), Duration::seconds(30));
        assert_eq!(effective_ttl(Some(7200)), Duration::seconds(3600));
        assert_eq!(effective_ttl(Some(-5)), Duration::seconds(3600));
        assert_eq!(effective_ttl(Some(0)), Duration::seconds(3600));
        assert_eq!(effective_ttl(Some(3600)), Duration::seconds(3600));
        assert_eq!(effective_ttl(None), Duration::seconds(3600));
    }

    #[test]
    fn clamped_ttl_drives_expiry() {
        let issued_at = Utc::now();
        let token =
            generate_access_token_at(Uuid::new_v4(), SECRET, effective_ttl(Some(7200)), issued_at)
                .unwrap();
        assert_eq!(claims_of(&token).exp, issued_at.timestamp() + 3600);
    }
}
