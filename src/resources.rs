// ABOUTME: Shared server resources threaded through every route handler
// ABOUTME: Wraps the database, auth manager, and runtime configuration in one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use std::sync::Arc;

/// Dependencies shared by all route handlers
#[derive(Clone)]
pub struct ServerResources {
    /// SQLite database manager
    pub database: Database,
    /// Token generation and validation
    pub auth_manager: Arc<AuthManager>,
    /// Runtime configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble the shared resource bundle
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        Self {
            database,
            auth_manager: Arc::new(auth_manager),
            config: Arc::new(config),
        }
    }
}
