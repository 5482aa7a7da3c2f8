// ABOUTME: HTTP route modules and shared response envelope helpers
// ABOUTME: Every response carries a top-level success boolean
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

pub mod auth;
pub mod health;
pub mod ingredients;
pub mod recipes;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;

use crate::errors::AppError;
use crate::query::Pagination;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

/// Successful single-record response body
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    /// Always `true`
    pub success: bool,
    /// The record
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Wrap a record in the success envelope
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Successful message-only response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Always `true`
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message in the success envelope
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Successful list-page response body
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Always `true`
    pub success: bool,
    /// The page of records, shaped per the `fields` selection
    pub data: Vec<serde_json::Value>,
    /// Number of records on this page
    pub records_on_page: usize,
    /// Page navigation descriptor
    pub pagination: Pagination,
}

impl ListResponse {
    /// Wrap a page of records in the success envelope
    pub fn new(data: Vec<serde_json::Value>, pagination: Pagination) -> Self {
        Self {
            success: true,
            records_on_page: data.len(),
            data,
            pagination,
        }
    }
}

/// Unwrap an optional-content-type JSON body, mapping rejections to the
/// API's 415/400 contract
///
/// # Errors
///
/// Returns an unsupported-media-type error when the request did not carry
/// a JSON content type, and an invalid-input error for unparseable bodies.
pub fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(AppError::unsupported_media_type()),
        Err(_) => Err(AppError::invalid_input("Invalid JSON body")),
    }
}
