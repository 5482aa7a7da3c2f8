// ABOUTME: Shared fixtures for integration tests: in-memory resources and test users
// ABOUTME: Every test gets its own isolated in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

use larder::auth::{hash_password, AuthManager};
use larder::config::{
    AuthConfig, DatabaseConfig, Environment, LogLevel, PaginationConfig, ServerConfig,
};
use larder::database::Database;
use larder::models::User;
use larder::resources::ServerResources;
use std::sync::Arc;

const TEST_JWT_SECRET: &str = "larder-test-secret";
const TEST_PASSWORD: &str = "secret1";

fn test_config() -> ServerConfig {
    ServerConfig {
        environment: Environment::Development,
        http_port: 0,
        log_level: LogLevel::Error,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_expiry_minutes: 30,
        },
        pagination: PaginationConfig { per_page: 5 },
    }
}

/// Build server resources backed by a fresh in-memory database
pub async fn create_test_server_resources() -> anyhow::Result<Arc<ServerResources>> {
    let database = Database::new_in_memory().await?;
    let auth_manager = AuthManager::new(TEST_JWT_SECRET.to_string(), 30);
    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        test_config(),
    )))
}

/// Register a test user directly through the database layer
pub async fn create_test_user(database: &Database) -> anyhow::Result<User> {
    let password_hash = hash_password(TEST_PASSWORD)?;
    let user = database
        .create_user("alice", "alice@example.com", &password_hash)
        .await?;
    Ok(user)
}

/// The raw password matching [`create_test_user`]
pub const fn test_password() -> &'static str {
    TEST_PASSWORD
}

/// Resources plus a valid bearer token for a registered user
pub async fn create_authed_resources() -> anyhow::Result<(Arc<ServerResources>, String)> {
    let resources = create_test_server_resources().await?;
    let user = create_test_user(&resources.database).await?;
    let token = resources.auth_manager.generate_token(user.id)?;
    Ok((resources, token))
}
