// ABOUTME: Recipe queries: CRUD, list pipeline columns, and join-row management
// ABOUTME: Ingredient references resolve by name inside a transaction, all-or-nothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use super::{is_unique_violation, Database};
use crate::errors::AppError;
use crate::models::Recipe;
use crate::query::{row_value_json, run_list_query, ListParams};
use crate::schemas::{round_decimal, RecipeIngredientEntry};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

/// Columns the list pipeline may select, sort, or filter on
pub const RECIPE_COLUMNS: &[&str] = &["id", "name", "description", "servings"];

/// One resolved ingredient line inside a recipe response
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecipeIngredientLine {
    /// Ingredient name
    pub name: String,
    /// Amount in the ingredient's unit
    pub amount: f64,
    /// Ingredient unit
    pub unit: String,
}

/// A recipe with its resolved ingredient lines
#[derive(Debug, Clone, Serialize)]
pub struct RecipeWithIngredients {
    /// Row id
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Number of servings the amounts are scaled for
    pub servings: i64,
    /// Resolved ingredient lines, in ingredient-id order
    pub ingredients: Vec<RecipeIngredientLine>,
}

fn recipe_row_json(row: &SqliteRow) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for column in RECIPE_COLUMNS {
        object.insert((*column).to_string(), row_value_json(row, column));
    }
    serde_json::Value::Object(object)
}

/// Resolve each entry's ingredient name to an id and insert the join rows
///
/// Fails on the first unknown name so the surrounding transaction rolls
/// the whole write back.
async fn insert_join_rows(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    entries: &[RecipeIngredientEntry],
) -> Result<(), AppError> {
    for entry in entries {
        let Some(name) = entry.name.as_deref() else {
            continue;
        };
        let Some(amount) = entry.amount else {
            continue;
        };

        let ingredient_id: Option<i64> = sqlx::query("SELECT id FROM ingredients WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?
            .map(|row| row.get(0));

        let Some(ingredient_id) = ingredient_id else {
            return Err(AppError::invalid_input(format!(
                "Ingredient '{name}' does not exist"
            )));
        };

        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(round_decimal(amount))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

impl Database {
    /// List recipes through the query pipeline (column shape only)
    ///
    /// # Errors
    ///
    /// Returns a database error if the queries fail.
    pub async fn list_recipes(
        &self,
        params: &ListParams,
    ) -> Result<(Vec<serde_json::Value>, i64), AppError> {
        let (rows, total) =
            run_list_query(self.pool(), "recipes", RECIPE_COLUMNS, params, recipe_row_json)
                .await?;
        Ok((params.shape_rows(rows), total))
    }

    /// Create a recipe with its ingredient lines, atomically
    ///
    /// Either the recipe row and every join row land, or nothing does.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken, an invalid-input
    /// error when an ingredient name does not exist, or a database error
    /// otherwise.
    pub async fn create_recipe(
        &self,
        name: &str,
        description: &str,
        servings: i64,
        entries: &[RecipeIngredientEntry],
    ) -> Result<RecipeWithIngredients, AppError> {
        let mut tx = self.pool().begin().await?;

        let result =
            sqlx::query("INSERT INTO recipes (name, description, servings) VALUES (?, ?, ?)")
                .bind(name)
                .bind(description)
                .bind(servings)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::conflict(format!("Recipe '{name}' already exists"))
                    } else {
                        AppError::from(e)
                    }
                })?;
        let recipe_id = result.last_insert_rowid();

        insert_join_rows(&mut tx, recipe_id, entries).await?;
        tx.commit().await?;

        self.get_recipe(recipe_id)
            .await?
            .ok_or_else(|| AppError::internal("Recipe vanished after insert"))
    }

    /// Fetch one recipe with its resolved ingredient lines
    ///
    /// # Errors
    ///
    /// Returns a database error if the queries fail.
    pub async fn get_recipe(
        &self,
        recipe_id: i64,
    ) -> Result<Option<RecipeWithIngredients>, AppError> {
        let Some(recipe) = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .fetch_optional(self.pool())
            .await?
        else {
            return Ok(None);
        };

        let ingredients = sqlx::query_as::<_, RecipeIngredientLine>(
            r"
            SELECT i.name, ri.amount, i.unit
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ?
            ORDER BY ri.ingredient_id ASC
            ",
        )
        .bind(recipe_id)
        .fetch_all(self.pool())
        .await?;

        Ok(Some(RecipeWithIngredients {
            id: recipe.id,
            name: recipe.name,
            description: recipe.description,
            servings: recipe.servings,
            ingredients,
        }))
    }

    /// Partially update a recipe; a supplied `ingredients` list replaces
    /// the existing join rows wholesale
    ///
    /// Returns the updated recipe, or `None` if the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the new name is taken, an
    /// invalid-input error when an ingredient name does not exist, or a
    /// database error otherwise.
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        name: Option<&str>,
        description: Option<&str>,
        servings: Option<i64>,
        entries: Option<&[RecipeIngredientEntry]>,
    ) -> Result<Option<RecipeWithIngredients>, AppError> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                servings = COALESCE(?, servings)
            WHERE id = ?
            ",
        )
        .bind(name)
        .bind(description)
        .bind(servings)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Recipe with this name already exists")
            } else {
                AppError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(entries) = entries {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await?;
            insert_join_rows(&mut tx, recipe_id, entries).await?;
        }

        tx.commit().await?;
        self.get_recipe(recipe_id).await
    }

    /// Delete a recipe; its join rows cascade away
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_recipe(&self, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
