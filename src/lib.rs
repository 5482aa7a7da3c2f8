// ABOUTME: Main library entry point for the Larder recipe catalog API
// ABOUTME: Exposes the database, query pipeline, auth, and HTTP route modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

#![deny(unsafe_code)]

//! # Larder
//!
//! A REST API for managing a recipe and ingredient catalog: user
//! registration and token authentication, CRUD over ingredients and
//! recipes, and a many-to-many recipe-ingredient relationship with
//! per-recipe quantities.
//!
//! ## Features
//!
//! - **Bearer-token auth**: HS256-signed tokens issued on registration
//!   and login; protected routes decode the user id statelessly
//! - **Query pipeline**: every list endpoint supports field selection,
//!   multi-key sorting, comparison-operator filters, and pagination with
//!   navigable page URLs
//! - **Constraint-backed integrity**: the relational store is the sole
//!   arbiter of uniqueness and referential integrity; violations surface
//!   as conflict responses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use larder::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Larder configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod query;
pub mod resources;
pub mod routes;
pub mod schemas;
pub mod server;

pub use database::Database;
pub use errors::{AppError, AppResult, ErrorCode};
pub use resources::ServerResources;
