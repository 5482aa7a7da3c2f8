// ABOUTME: Health and readiness probes for deployment orchestration
// ABOUTME: Readiness verifies the database answers a trivial query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// Health probe routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health and readiness routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    /// Handle GET /health - process liveness
    async fn handle_health() -> Response {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "healthy",
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
            .into_response()
    }

    /// Handle GET /ready - database reachability
    async fn handle_ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ready",
            })),
        )
            .into_response())
    }
}
