// ABOUTME: Integration tests for the recipe route handlers
// ABOUTME: Covers ingredient resolution, atomic writes, cascade deletes, and list shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{create_authed_resources, create_test_server_resources};
use helpers::axum_test::AxumTestRequest;
use larder::server::build_router;
use larder::ServerResources;
use serde_json::json;
use std::sync::Arc;

async fn seed_ingredients(resources: &Arc<ServerResources>, token: &str) {
    for (name, calories, unit) in [
        ("Flour", 364.0, "g"),
        ("Milk", 42.0, "ml"),
        ("Egg", 78.0, "pcs"),
    ] {
        let response = AxumTestRequest::post("/api/v1/ingredients")
            .bearer(token)
            .json(&json!({"name": name, "calories": calories, "unit": unit}))
            .send(build_router(resources))
            .await;
        assert_eq!(response.status(), 201);
    }
}

#[tokio::test]
async fn test_create_recipe_resolves_ingredient_names() {
    let (resources, token) = create_authed_resources().await.unwrap();
    seed_ingredients(&resources, &token).await;

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Pancakes",
            "description": "Whisk and fry",
            "servings": 4,
            "ingredients": [
                {"name": "Flour", "amount": 200.0},
                {"name": "Milk", "amount": 300.0}
            ]
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["name"], "Pancakes");
    assert_eq!(body["data"]["ingredients"][0]["name"], "Flour");
    assert_eq!(body["data"]["ingredients"][0]["unit"], "g");
    assert_eq!(body["data"]["ingredients"][1]["amount"], 300.0);
}

#[tokio::test]
async fn test_create_with_unknown_ingredient_writes_nothing() {
    let (resources, token) = create_authed_resources().await.unwrap();
    seed_ingredients(&resources, &token).await;

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Pancakes",
            "description": "Whisk and fry",
            "ingredients": [
                {"name": "Flour", "amount": 200.0},
                {"name": "Unicorn Dust", "amount": 1.0}
            ]
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 400);

    // All-or-nothing: the recipe row must not exist.
    let response = AxumTestRequest::get("/api/v1/recipes")
        .send(build_router(&resources))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["records_on_page"], 0);
    assert_eq!(body["pagination"]["total_records"], 0);
}

#[tokio::test]
async fn test_missing_ingredients_key_is_validation_error() {
    let (resources, token) = create_authed_resources().await.unwrap();

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({"name": "Pancakes", "description": "Whisk and fry"}))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["message"]["ingredients"].is_array());
}

#[tokio::test]
async fn test_servings_defaults_to_one() {
    let (resources, token) = create_authed_resources().await.unwrap();
    seed_ingredients(&resources, &token).await;

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Boiled egg",
            "description": "Boil for seven minutes",
            "ingredients": [{"name": "Egg", "amount": 1.0}]
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["servings"], 1);
}

#[tokio::test]
async fn test_list_uses_column_shape_only() {
    let (resources, token) = create_authed_resources().await.unwrap();
    seed_ingredients(&resources, &token).await;

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Pancakes",
            "description": "Whisk and fry",
            "ingredients": [{"name": "Flour", "amount": 200.0}]
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 201);

    let response = AxumTestRequest::get("/api/v1/recipes")
        .send(build_router(&resources))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"][0]["name"], "Pancakes");
    assert!(body["data"][0].get("ingredients").is_none());
}

#[tokio::test]
async fn test_update_replaces_ingredient_lines() {
    let (resources, token) = create_authed_resources().await.unwrap();
    seed_ingredients(&resources, &token).await;

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Pancakes",
            "description": "Whisk and fry",
            "ingredients": [{"name": "Flour", "amount": 200.0}]
        }))
        .send(build_router(&resources))
        .await;
    let created: serde_json::Value = response.json();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = AxumTestRequest::put(&format!("/api/v1/recipes/{id}"))
        .bearer(&token)
        .json(&json!({
            "ingredients": [
                {"name": "Milk", "amount": 300.0},
                {"name": "Egg", "amount": 2.0}
            ]
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["data"]["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Milk", "Egg"]);
}

#[tokio::test]
async fn test_delete_recipe_keeps_ingredients() {
    let (resources, token) = create_authed_resources().await.unwrap();
    seed_ingredients(&resources, &token).await;

    let response = AxumTestRequest::post("/api/v1/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Pancakes",
            "description": "Whisk and fry",
            "ingredients": [{"name": "Flour", "amount": 200.0}]
        }))
        .send(build_router(&resources))
        .await;
    let created: serde_json::Value = response.json();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = AxumTestRequest::delete(&format!("/api/v1/recipes/{id}"))
        .bearer(&token)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 200);

    // The catalog itself is untouched.
    let response = AxumTestRequest::get("/api/v1/ingredients")
        .send(build_router(&resources))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["pagination"]["total_records"], 3);
}

#[tokio::test]
async fn test_register_login_and_empty_list_scenario() {
    let resources = create_test_server_resources().await.unwrap();

    let response = AxumTestRequest::post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@x.com",
            "password": "secret1"
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json();
    assert!(body["token"].is_string());

    let response = AxumTestRequest::post("/api/v1/auth/login")
        .json(&json!({"username": "alice", "password": "wrong"}))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 401);

    let response = AxumTestRequest::get("/api/v1/recipes")
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["records_on_page"], 0);
}
