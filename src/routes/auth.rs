// ABOUTME: Authentication routes: register, login, profile, password and data updates
// ABOUTME: Registration and login both issue a signed bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! Authentication routes
//!
//! Registration immediately issues a token so clients never need a
//! follow-up login. Protected handlers receive the decoded user id from
//! the bearer token and never consult a session store.

use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::middleware::AuthedUser;
use crate::resources::ServerResources;
use crate::routes::{require_json, DataResponse, MessageResponse};
use crate::schemas::{LoginPayload, PasswordUpdatePayload, ProfileUpdatePayload, RegisterPayload};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Token-issuing response body
#[derive(Debug, Serialize)]
struct TokenResponse {
    success: bool,
    token: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/auth/register", post(Self::handle_register))
            .route("/api/v1/auth/login", post(Self::handle_login))
            .route("/api/v1/auth/me", get(Self::handle_me))
            .route(
                "/api/v1/auth/update/password",
                put(Self::handle_update_password),
            )
            .route("/api/v1/auth/update/data", patch(Self::handle_update_data))
            .with_state(resources)
    }

    /// Handle POST /api/v1/auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RegisterPayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        body.validate()?;

        // Validation guarantees presence.
        let username = body.username.as_deref().unwrap_or_default();
        let email = body.email.as_deref().unwrap_or_default();
        let password = body.password.as_deref().unwrap_or_default();

        let password_hash = hash_password(password)?;
        let user = resources
            .database
            .create_user(username, email, &password_hash)
            .await?;

        info!(user_id = user.id, username, "Registered new user");
        let token = resources.auth_manager.generate_token(user.id)?;
        Ok((
            StatusCode::CREATED,
            Json(TokenResponse {
                success: true,
                token,
            }),
        )
            .into_response())
    }

    /// Handle POST /api/v1/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginPayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        body.validate()?;

        let username = body.username.as_deref().unwrap_or_default();
        let password = body.password.as_deref().unwrap_or_default();

        let user = resources
            .database
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid credentials"))?;

        if !verify_password(password, &user.password) {
            return Err(AppError::auth_invalid("Invalid credentials"));
        }

        info!(user_id = user.id, "User logged in");
        let token = resources.auth_manager.generate_token(user.id)?;
        Ok((
            StatusCode::OK,
            Json(TokenResponse {
                success: true,
                token,
            }),
        )
            .into_response())
    }

    /// Handle GET /api/v1/auth/me
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok((StatusCode::OK, Json(DataResponse::new(user))).into_response())
    }

    /// Handle PUT /api/v1/auth/update/password
    async fn handle_update_password(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        payload: Result<Json<PasswordUpdatePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        body.validate()?;

        let current = body.current_password.as_deref().unwrap_or_default();
        let new = body.new_password.as_deref().unwrap_or_default();

        let user = resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !verify_password(current, &user.password) {
            return Err(AppError::auth_invalid("Invalid credentials"));
        }

        let password_hash = hash_password(new)?;
        resources
            .database
            .update_user_password(user_id, &password_hash)
            .await?;

        info!(user_id, "Password updated");
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Password updated")),
        )
            .into_response())
    }

    /// Handle PATCH /api/v1/auth/update/data
    async fn handle_update_data(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        payload: Result<Json<ProfileUpdatePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        body.validate()?;

        resources
            .database
            .update_user_profile(user_id, body.username.as_deref(), body.email.as_deref())
            .await?;

        let user = resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id, "Profile updated");
        Ok((StatusCode::OK, Json(DataResponse::new(user))).into_response())
    }
}
