// ABOUTME: Sample data seeder for local development and demos
// ABOUTME: Loads ingredients and recipes best-effort, logging and skipping failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! Sample data seeder for the Larder API.
//!
//! Populates the database with a starter catalog of ingredients and
//! recipes. Rows that fail to insert (usually because they already
//! exist) are logged and skipped so reseeding an existing database is
//! harmless.
//!
//! Usage:
//! ```bash
//! # Seed the configured database with the built-in catalog
//! cargo run --bin seed-sample-data
//!
//! # Seed from a JSON file
//! cargo run --bin seed-sample-data -- --file data/sample.json
//!
//! # Seed a specific database
//! cargo run --bin seed-sample-data -- --database-url sqlite:data/dev.db
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use larder::database::Database;
use larder::schemas::RecipeIngredientEntry;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "seed-sample-data",
    about = "Larder sample data seeder",
    long_about = "Populate the database with a starter catalog of ingredients and recipes"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// JSON file with ingredients and recipes (built-in catalog if omitted)
    #[arg(long)]
    file: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedIngredient {
    name: String,
    calories: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct SeedRecipeIngredient {
    name: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct SeedRecipe {
    name: String,
    description: String,
    #[serde(default = "default_servings")]
    servings: i64,
    #[serde(default)]
    ingredients: Vec<SeedRecipeIngredient>,
}

const fn default_servings() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
struct SeedData {
    #[serde(default)]
    ingredients: Vec<SeedIngredient>,
    #[serde(default)]
    recipes: Vec<SeedRecipe>,
}

const BUILTIN_CATALOG: &str = r#"{
    "ingredients": [
        {"name": "Flour", "calories": 364.0, "unit": "g"},
        {"name": "Sugar", "calories": 387.0, "unit": "g"},
        {"name": "Butter", "calories": 717.0, "unit": "g"},
        {"name": "Milk", "calories": 42.0, "unit": "ml"},
        {"name": "Egg", "calories": 78.0, "unit": "pcs"},
        {"name": "Salt", "calories": 0.0, "unit": "g"},
        {"name": "Olive oil", "calories": 884.0, "unit": "ml"},
        {"name": "Tomato", "calories": 18.0, "unit": "pcs"}
    ],
    "recipes": [
        {
            "name": "Pancakes",
            "description": "Whisk, rest, fry on a hot pan",
            "servings": 4,
            "ingredients": [
                {"name": "Flour", "amount": 200.0},
                {"name": "Milk", "amount": 300.0},
                {"name": "Egg", "amount": 2.0},
                {"name": "Butter", "amount": 30.0}
            ]
        },
        {
            "name": "Tomato salad",
            "description": "Slice, season, drizzle with oil",
            "servings": 2,
            "ingredients": [
                {"name": "Tomato", "amount": 4.0},
                {"name": "Olive oil", "amount": 20.0},
                {"name": "Salt", "amount": 2.0}
            ]
        }
    ]
}"#;

async fn seed(database: &Database, data: &SeedData) -> (usize, usize) {
    let mut inserted = 0;
    let mut skipped = 0;

    for ingredient in &data.ingredients {
        match database
            .create_ingredient(&ingredient.name, ingredient.calories, &ingredient.unit)
            .await
        {
            Ok(_) => inserted += 1,
            Err(e) => {
                warn!("Skipping ingredient '{}': {e}", ingredient.name);
                skipped += 1;
            }
        }
    }

    for recipe in &data.recipes {
        let entries: Vec<RecipeIngredientEntry> = recipe
            .ingredients
            .iter()
            .map(|line| RecipeIngredientEntry {
                name: Some(line.name.clone()),
                amount: Some(line.amount),
            })
            .collect();

        match database
            .create_recipe(&recipe.name, &recipe.description, recipe.servings, &entries)
            .await
        {
            Ok(_) => inserted += 1,
            Err(e) => {
                warn!("Skipping recipe '{}': {e}", recipe.name);
                skipped += 1;
            }
        }
    }

    (inserted, skipped)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    larder::logging::init_from_env()?;

    let config = larder::config::ServerConfig::from_env()?;
    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database.url.clone());

    let raw = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {path}"))?,
        None => BUILTIN_CATALOG.to_string(),
    };
    let data: SeedData = serde_json::from_str(&raw).context("Invalid seed data JSON")?;

    let database = Database::new(&database_url).await?;
    let (inserted, skipped) = seed(&database, &data).await;

    info!("Seeding complete: {inserted} inserted, {skipped} skipped");
    Ok(())
}
