// ABOUTME: Configuration module organization for the Larder API server
// ABOUTME: Exposes environment-based server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

/// Environment-based configuration management
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, Environment, LogLevel, PaginationConfig, ServerConfig,
    DEFAULT_PER_PAGE,
};
