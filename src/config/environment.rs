// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Default port the HTTP server binds to
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: u32 = 5;

/// Default token lifetime in minutes
pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 30;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection string
    pub url: String,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens (HS256)
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub token_expiry_minutes: i64,
}

/// Pagination defaults for list endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Default page size when the request carries no `limit`
    pub per_page: u32,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP port to bind
    pub http_port: u16,
    /// Application log level
    pub log_level: LogLevel,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Pagination settings
    pub pagination: PaginationConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset in a production environment
    /// or if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT value: {value}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let log_level =
            LogLevel::from_str_or_default(&env::var("RUST_LOG").unwrap_or_default());

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/larder.db".into());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                anyhow::bail!("JWT_SECRET must be set in production")
            }
            _ => {
                warn!("JWT_SECRET not set, using insecure development secret");
                "larder-dev-secret".into()
            }
        };

        let token_expiry_minutes = match env::var("JWT_EXPIRY_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .with_context(|| format!("Invalid JWT_EXPIRY_MINUTES value: {value}"))?,
            Err(_) => DEFAULT_TOKEN_EXPIRY_MINUTES,
        };

        let per_page = match env::var("PER_PAGE") {
            Ok(value) => value
                .parse::<u32>()
                .with_context(|| format!("Invalid PER_PAGE value: {value}"))?,
            Err(_) => DEFAULT_PER_PAGE,
        };

        Ok(Self {
            environment,
            http_port,
            log_level,
            database: DatabaseConfig { url: database_url },
            auth: AuthConfig {
                jwt_secret,
                token_expiry_minutes,
            },
            pagination: PaginationConfig { per_page },
        })
    }

    /// One-line configuration summary for startup logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http_port={} database={} token_expiry_minutes={} per_page={}",
            self.environment,
            self.http_port,
            self.database.url,
            self.auth.token_expiry_minutes,
            self.pagination.per_page
        )
    }
}
