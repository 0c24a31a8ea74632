//! Authentication
//!
//! Requests carry an HS256 JWT whose `sub` claim is the user's UUID, either
//! as `Authorization: Bearer <token>` or in the `session` cookie.

use axum::http::{header, HeaderMap};
use chrono::{TimeDelta, Utc};
use core_kernel::UserId;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the cookie that may hold the session token
pub const SESSION_COOKIE: &str = "session";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),
    #[error("Token lifetime out of range: {0}s")]
    InvalidLifetime(u64),
}

/// The authenticated user, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user_id` - User identifier, becomes the `sub` claim
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(user_id: UserId, secret: &str, expiration_secs: u64) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or(AuthError::InvalidLifetime(expiration_secs))?;

    let claims = Claims {
        sub: user_id.as_uuid().to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Validates a token and resolves its subject to a user
pub fn authenticate(token: &str, secret: &str) -> Result<CurrentUser, AuthError> {
    let claims = validate_token(token, secret)?;
    let id = claims
        .sub
        .parse::<UserId>()
        .map_err(|_| AuthError::InvalidSubject(claims.sub.clone()))?;

    Ok(CurrentUser { id })
}

/// Authenticates a request from its headers
pub fn authenticate_request(headers: &HeaderMap, secret: &str) -> Result<CurrentUser, AuthError> {
    let token = token_from_headers(headers).ok_or(AuthError::MissingToken)?;
    authenticate(token, secret)
}

/// Finds the token in the request headers; the bearer header takes precedence
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value)
            .filter(|t| !t.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_roundtrip() {
        let user = UserId::new();
        let token = create_token(user, SECRET, 60).unwrap();

        let current = authenticate(&token, SECRET).unwrap();
        assert_eq!(current.id, user);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(UserId::new(), SECRET, 60).unwrap();
        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().as_uuid().to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_non_uuid_subject() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: now + 60,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            authenticate(&token, SECRET),
            Err(AuthError::InvalidSubject(_))
        ));
    }

    #[test]
    fn test_lifetime_out_of_range_is_rejected() {
        assert!(matches!(
            create_token(UserId::new(), SECRET, u64::MAX),
            Err(AuthError::InvalidLifetime(u64::MAX))
        ));
        assert!(matches!(
            create_token(UserId::new(), SECRET, i64::MAX as u64),
            Err(AuthError::InvalidLifetime(_))
        ));
    }

    #[test]
    fn test_authenticate_request() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            authenticate_request(&headers, SECRET),
            Err(AuthError::MissingToken)
        ));

        let user = UserId::new();
        let token = create_token(user, SECRET, 60).unwrap();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(authenticate_request(&headers, SECRET).unwrap().id, user);
    }

    #[test]
    fn test_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc.def"));
        assert_eq!(token_from_headers(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers), Some("xyz"));
    }
}
