// ABOUTME: Bearer-token authentication: header extraction, validation, 401 mapping
// ABOUTME: AuthedUser is an axum extractor carrying the authenticated user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::debug;

/// Pull the bearer token out of the `Authorization` header
///
/// # Errors
///
/// Returns an auth-required error when the header is missing, is not
/// valid UTF-8, or does not carry the `Bearer` scheme.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_required("Missing or invalid Authorization header"))
}

/// Authenticated user id, extracted from a validated bearer token
///
/// Handlers that require authentication take this as an argument; the
/// extractor rejects with the appropriate 401 body before the handler
/// runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub i64);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for AuthedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let user_id = state.auth_manager.validate_token(token)?;
        debug!(user_id, "Authenticated request");
        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        let err = extract_bearer_token(&headers).unwrap_err();
        assert_eq!(err.message, "Missing or invalid Authorization header");
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());
    }
}
