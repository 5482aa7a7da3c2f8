// ABOUTME: Main server binary: loads configuration, opens the database, serves HTTP
// ABOUTME: Port and database URL can be overridden on the command line
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! # Larder API Server Binary
//!
//! Starts the recipe catalog REST API with token authentication and
//! SQLite persistence.

use anyhow::Result;
use clap::Parser;
use larder::{
    auth::AuthManager, config::ServerConfig, database::Database, logging, server,
    ServerResources,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "larder-server")]
#[command(about = "Larder - recipe and ingredient catalog REST API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Larder API server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiry_minutes,
    );

    let resources = Arc::new(ServerResources::new(database, auth_manager, config));
    server::serve(resources).await
}
