// ABOUTME: Ingredient catalog routes: paginated list, get, create, update, delete
// ABOUTME: Reads are public; writes require a bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use crate::database::ingredients::INGREDIENT_COLUMNS;
use crate::errors::AppError;
use crate::middleware::AuthedUser;
use crate::query::ListParams;
use crate::resources::ServerResources;
use crate::routes::{require_json, DataResponse, ListResponse, MessageResponse};
use crate::schemas::{round_decimal, IngredientPayload};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

const BASE_PATH: &str = "/api/v1/ingredients";

/// Ingredient routes handler
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/ingredients", get(Self::handle_list))
            .route("/api/v1/ingredients", post(Self::handle_create))
            .route("/api/v1/ingredients/:id", get(Self::handle_get))
            .route("/api/v1/ingredients/:id", put(Self::handle_update))
            .route("/api/v1/ingredients/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /api/v1/ingredients
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        RawQuery(raw_query): RawQuery,
    ) -> Result<Response, AppError> {
        let params = ListParams::parse(
            raw_query.as_deref().unwrap_or(""),
            INGREDIENT_COLUMNS,
            resources.config.pagination.per_page,
        );
        let (data, total_records) = resources.database.list_ingredients(&params).await?;
        let pagination = params.paginate(BASE_PATH, total_records);
        Ok((StatusCode::OK, Json(ListResponse::new(data, pagination))).into_response())
    }

    /// Handle GET /api/v1/ingredients/{id}
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let ingredient = resources
            .database
            .get_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient with id {id} not found")))?;
        Ok((StatusCode::OK, Json(DataResponse::new(ingredient))).into_response())
    }

    /// Handle POST /api/v1/ingredients
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        payload: Result<Json<IngredientPayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        body.validate_create()?;

        // Validation guarantees presence.
        let name = body.name.as_deref().unwrap_or_default();
        let calories = round_decimal(body.calories.unwrap_or_default());
        let unit = body.unit.as_deref().unwrap_or_default();

        let ingredient = resources
            .database
            .create_ingredient(name, calories, unit)
            .await?;

        info!(user_id, ingredient_id = ingredient.id, "Created ingredient");
        Ok((StatusCode::CREATED, Json(DataResponse::new(ingredient))).into_response())
    }

    /// Handle PUT /api/v1/ingredients/{id}
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        Path(id): Path<i64>,
        payload: Result<Json<IngredientPayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = require_json(payload)?;
        if body.name.is_none() && body.calories.is_none() && body.unit.is_none() {
            return Err(AppError::invalid_input("No data provided for update"));
        }
        body.validate_partial()?;

        let ingredient = resources
            .database
            .update_ingredient(
                id,
                body.name.as_deref(),
                body.calories.map(round_decimal),
                body.unit.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient with id {id} not found")))?;

        info!(user_id, ingredient_id = id, "Updated ingredient");
        Ok((StatusCode::OK, Json(DataResponse::new(ingredient))).into_response())
    }

    /// Handle DELETE /api/v1/ingredients/{id}
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        AuthedUser(user_id): AuthedUser,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        if !resources.database.delete_ingredient(id).await? {
            return Err(AppError::not_found(format!(
                "Ingredient with id {id} not found"
            )));
        }

        info!(user_id, ingredient_id = id, "Deleted ingredient");
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new(format!(
                "Ingredient with id {id} has been deleted"
            ))),
        )
            .into_response())
    }
}
