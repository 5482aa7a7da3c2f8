// ABOUTME: JWT-based user authentication: token generation, validation, password hashing
// ABOUTME: Stateless HS256 bearer tokens carrying the user id and an expiry timestamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! # Authentication
//!
//! This module provides stateless bearer-token authentication. Tokens are
//! signed with a server-held secret (HS256) and encode the user's id and an
//! expiry timestamp. Handlers never consult a session store; the decoded
//! user id is the whole identity.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Token validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper JWT format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(f, "token expired at {}", expired_at.to_rfc3339())
            }
            Self::TokenInvalid { reason } => write!(f, "token signature is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => {
                Self::auth_expired("Expired token. Please login to get new token")
            }
            JwtValidationError::TokenInvalid { .. } | JwtValidationError::TokenMalformed { .. } => {
                Self::auth_invalid("Invalid token. Please login or register")
            }
        }
    }
}

/// Token claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication manager for bearer tokens and password verification
#[derive(Clone)]
pub struct AuthManager {
    secret: String,
    token_expiry_minutes: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub const fn new(secret: String, token_expiry_minutes: i64) -> Self {
        Self {
            secret,
            token_expiry_minutes,
        }
    }

    /// Generate a signed token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.token_expiry_minutes);

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a token and return the authenticated user id
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is expired, has an
    /// invalid signature, or is not valid JWT format.
    pub fn validate_token(&self, token: &str) -> Result<i64, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // jsonwebtoken rejects a token expiring within leeway seconds of
        // now; zero leeway keeps the expiry boundary exact for tests.
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| Self::convert_jwt_error(&e, token, &self.secret))?;

        tracing::debug!(user_id = token_data.claims.sub, "token validated");
        Ok(token_data.claims.sub)
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(
        e: &jsonwebtoken::errors::Error,
        token: &str,
        secret: &str,
    ) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                let expired_at = Self::decode_expiry(token, secret).unwrap_or_else(Utc::now);
                tracing::debug!(expired_at = %expired_at.to_rfc3339(), "expired token presented");
                JwtValidationError::TokenExpired { expired_at }
            }
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Decode the expiry claim of an already-expired token for logging
    fn decode_expiry(token: &str, secret: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let token_data =
            decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
                .ok()?;
        DateTime::from_timestamp(token_data.claims.exp, 0)
    }

    /// Token lifetime in minutes
    #[must_use]
    pub const fn token_expiry_minutes(&self) -> i64 {
        self.token_expiry_minutes
    }
}

/// Hash a raw password with a per-hash salt
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails.
pub fn hash_password(raw: &str) -> AppResult<String> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a raw password against a stored hash
///
/// Verification failure and hash-parse failure both report `false` so
/// callers return the same unauthorized error in either case.
#[must_use]
pub fn verify_password(raw: &str, stored_hash: &str) -> bool {
    bcrypt::verify(raw, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AuthManager {
        AuthManager::new("test-secret".into(), 30)
    }

    #[test]
    fn test_token_round_trip() {
        let auth = manager();
        let token = auth.generate_token(42).unwrap();
        assert_eq!(auth.validate_token(&token).unwrap(), 42);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = AuthManager::new("test-secret".into(), -1);
        let token = auth.generate_token(42).unwrap();
        match auth.validate_token(&token) {
            Err(JwtValidationError::TokenExpired { .. }) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token(42).unwrap();
        let other = AuthManager::new("other-secret".into(), 30);
        match other.validate_token(&token) {
            Err(JwtValidationError::TokenInvalid { .. }) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_token_malformed() {
        match manager().validate_token("not-a-token") {
            Err(JwtValidationError::TokenMalformed { .. }) => {}
            other => panic!("expected TokenMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_jwt_error_maps_to_401_messages() {
        let expired: AppError = JwtValidationError::TokenExpired {
            expired_at: Utc::now(),
        }
        .into();
        assert_eq!(expired.http_status(), 401);
        assert!(expired.message.contains("Expired token"));

        let invalid: AppError = JwtValidationError::TokenInvalid {
            reason: "bad".into(),
        }
        .into();
        assert_eq!(invalid.http_status(), 401);
        assert!(invalid.message.contains("Invalid token"));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
