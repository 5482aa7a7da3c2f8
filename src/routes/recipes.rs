// ABOUTME: Recipe routes: paginated list, get with embedded ingredients, create, update, delete
// ABOUTME: Reads are public; writes require a bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use crate::database::recipes::RECIPE_COLUMNS;
use crate::errors::AppError;
use crate::middleware::AuthedUser;
use crate::query::ListParams;
use crate::resources::ServerResources;
use crate::routes::{require_json, DataResponse, ListResponse, MessageResponse};
use crate::schemas::RecipePayload;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

const BASE_PATH: &str = "/api/v1/recipes";

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/recipes", get(Self::handle_list))
            .route("/api/v1/recipes", post(Self::handle_create))
            .route("/api/v1/recipes/:id", get(Self::handle_get))
            .route("/api/v1/recipes/:id", put(Self::handle_update))
            .route("/api/v1/recipes/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /api/v1/recipes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        RawQuery(raw_query): RawQuery,
    ) -> Result<Response, AppError> {
        let params = ListParams::parse(
            raw_query.as_deref().unwrap_or(""),
            RECIPE_COLUMNS,
            resources.config.pagination.per_page,
        );
        let (data, total_records) = resources.database.list_recipes(&params).await?;
        let pagination = params.paginate(BASE_PATH, total_records);
        Ok((StatusCode::OK, Json(ListResponse::new(data, pagination))).into_response())
    }

    /// Handle GET /api/v1/recipes/{id}
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .database
            .get_recipe(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe with id {id} not found")))?;
        Ok((StatusCode::OK, Json(DataResponse::new(recipe))).into_response())
    }

    /// Handle POST /api/v1/recipes
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        payload: Result<Json<RecipePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        body.validate_create()?;

        // Validation guarantees presence.
        let name = body.name.as_deref().unwrap_or_default();
        let description = body.description.as_deref().unwrap_or_default();
        let servings = body.servings.unwrap_or(1);
        let entries = body.ingredients.as_deref().unwrap_or_default();

        let recipe = resources
            .database
            .create_recipe(name, description, servings, entries)
            .await?;

        info!(user_id, recipe_id = recipe.id, "Created recipe");
        Ok((StatusCode::CREATED, Json(DataResponse::new(recipe))).into_response())
    }

    /// Handle PUT /api/v1/recipes/{id}
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        Path(id): Path<i64>,
        payload: Result<Json<RecipePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        if body.name.is_none()
            && body.description.is_none()
            && body.servings.is_none()
            && body.ingredients.is_none()
        {
            return Err(AppError::invalid_input("No data provided for update"));
        }
        body.validate_partial()?;

        let recipe = resources
            .database
            .update_recipe(
                id,
                body.name.as_deref(),
                body.description.as_deref(),
                body.servings,
                body.ingredients.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe with id {id} not found")))?;

        info!(user_id, recipe_id = id, "Updated recipe");
        Ok((StatusCode::OK, Json(DataResponse::new(recipe))).into_response())
    }

    /// Handle DELETE /api/v1/recipes/{id}
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        if !resources.database.delete_recipe(id).await? {
            return Err(AppError::not_found(format!("Recipe with id {id} not found")));
        }

        info!(user_id, recipe_id = id, "Deleted recipe");
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new(format!(
                "Recipe with id {id} has been deleted"
            ))),
        )
            .into_response())
    }
}
