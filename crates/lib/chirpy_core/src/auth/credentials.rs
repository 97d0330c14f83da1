//! Credential extraction from `Authorization` headers.
//!
//! Pure parsing: bearer tokens (`Bearer <token>`) for end users and API keys
//! (`ApiKey <key>`) for trusted server-to-server calls.

use http::HeaderMap;
use http::header::AUTHORIZATION;
use subtle::ConstantTimeEq;

use super::{AuthError, AuthResult};

/// Scheme prefix for end-user bearer credentials.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Scheme prefix for service API keys.
pub const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract a bearer token from the `Authorization` header.
pub fn extract_bearer(headers: &HeaderMap) -> AuthResult<String> {
    parse_bearer(authorization_value(headers)?)
}

/// Extract a service API key from the `Authorization` header.
pub fn extract_api_key(headers: &HeaderMap) -> AuthResult<String> {
    parse_api_key(authorization_value(headers)?)
}

/// Parse a raw `Authorization` value using the bearer scheme.
pub fn parse_bearer(raw: Option<&str>) -> AuthResult<String> {
    parse_scheme(raw, BEARER_PREFIX)
}

/// Parse a raw `Authorization` value using the API key scheme.
pub fn parse_api_key(raw: Option<&str>) -> AuthResult<String> {
    parse_scheme(raw, API_KEY_PREFIX)
}

/// Check the `Authorization` header against the configured service key.
pub fn verify_service_key_header(headers: &HeaderMap, configured_key: &str) -> AuthResult<()> {
    verify_service_key(authorization_value(headers)?, configured_key)
}

/// Check a raw `Authorization` value against the configured service key.
///
/// Comparison is constant-time over the key bytes.
pub fn verify_service_key(raw: Option<&str>, configured_key: &str) -> AuthResult<()> {
    let presented = parse_api_key(raw)?;
    if presented.as_bytes().ct_eq(configured_key.as_bytes()).into() {
        Ok(())
    } else {
        Err(AuthError::ServiceKeyMismatch)
    }
}

/// Read the `Authorization` header as text. Absent is `Ok(None)`.
fn authorization_value(headers: &HeaderMap) -> AuthResult<Option<&str>> {
    headers
        .get(AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map_err(|_| AuthError::MalformedCredential("header is not visible ASCII"))
        })
        .transpose()
}

fn parse_scheme(raw: Option<&str>, prefix: &'static str) -> AuthResult<String> {
    let value = match raw {
        None => return Err(AuthError::MissingCredential),
        Some(v) if v.trim().is_empty() => return Err(AuthError::MissingCredential),
        Some(v) => v,
    };

    let credential = value
        .strip_prefix(prefix)
        .ok_or(AuthError::MalformedCredential("unexpected authorization scheme"))?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::MalformedCredential("empty credential"));
    }
    Ok(credential.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(
            extract_bearer(&headers_with("Bearer abc123")).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn bearer_remainder_is_trimmed() {
        assert_eq!(parse_bearer(Some("Bearer  abc123 ")).unwrap(), "abc123");
    }

    #[test]
    fn lowercase_scheme_is_malformed() {
        assert!(matches!(
            extract_bearer(&headers_with("bearer abc123")),
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[test]
    fn missing_or_empty_header_is_missing() {
        assert!(matches!(
            extract_bearer(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            extract_bearer(&headers_with("")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            parse_bearer(None),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn scheme_without_credential_is_malformed() {
        assert!(matches!(
            parse_bearer(Some("Bearer ")),
            Err(AuthError::MalformedCredential(_))
        ));
        assert!(matches!(
            parse_bearer(Some("Bearer")),
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[test]
    fn non_ascii_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[test]
    fn api_key_is_extracted() {
        assert_eq!(
            extract_api_key(&headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e")).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
        assert!(matches!(
            extract_api_key(&headers_with("Bearer f271c81f")),
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[test]
    fn service_key_header_is_checked() {
        assert!(verify_service_key_header(&headers_with("ApiKey polka-key"), "polka-key").is_ok());
        assert!(matches!(
            verify_service_key_header(&headers_with("ApiKey other"), "polka-key"),
            Err(AuthError::ServiceKeyMismatch)
        ));
        assert!(matches!(
            verify_service_key_header(&HeaderMap::new(), "polka-key"),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn service_key_must_match_exactly() {
        assert!(verify_service_key(Some("ApiKey polka-key"), "polka-key").is_ok());
        assert!(matches!(
            verify_service_key(Some("ApiKey polka-ke"), "polka-key"),
            Err(AuthError::ServiceKeyMismatch)
        ));
        assert!(matches!(
            verify_service_key(Some("ApiKey POLKA-KEY"), "polka-key"),
            Err(AuthError::ServiceKeyMismatch)
        ));
        assert!(matches!(
            verify_service_key(None, "polka-key"),
            Err(AuthError::MissingCredential)
        ));
    }
}
