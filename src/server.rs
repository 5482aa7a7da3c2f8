// ABOUTME: HTTP server assembly: router composition, middleware layers, listener
// ABOUTME: Merges all route modules and serves them over a TCP listener
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::routes::{AuthRoutes, HealthRoutes, IngredientRoutes, RecipeRoutes};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Maximum accepted request body size (1 MiB)
const MAX_BODY_BYTES: usize = 1024 * 1024;

async fn handle_not_found() -> axum::response::Response {
    AppError::not_found("Resource not found").into_response()
}

/// Compose the full application router with its middleware stack
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(IngredientRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()))
        .fallback(handle_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.http_port;
    let router = build_router(&resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("HTTP server listening on port {port}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
