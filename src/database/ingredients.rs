// ABOUTME: Ingredient catalog queries: CRUD plus the whitelisted list pipeline columns
// ABOUTME: Unique name conflicts surface as AppError::conflict
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use super::{is_unique_violation, Database};
use crate::errors::AppError;
use crate::models::Ingredient;
use crate::query::{row_value_json, run_list_query, ListParams};
use sqlx::sqlite::SqliteRow;

/// Columns the list pipeline may select, sort, or filter on
pub const INGREDIENT_COLUMNS: &[&str] = &["id", "name", "calories", "unit"];

fn ingredient_row_json(row: &SqliteRow) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for column in INGREDIENT_COLUMNS {
        object.insert((*column).to_string(), row_value_json(row, column));
    }
    serde_json::Value::Object(object)
}

impl Database {
    /// List ingredients through the query pipeline
    ///
    /// # Errors
    ///
    /// Returns a database error if the queries fail.
    pub async fn list_ingredients(
        &self,
        params: &ListParams,
    ) -> Result<(Vec<serde_json::Value>, i64), AppError> {
        let (rows, total) = run_list_query(
            self.pool(),
            "ingredients",
            INGREDIENT_COLUMNS,
            params,
            ingredient_row_json,
        )
        .await?;
        Ok((params.shape_rows(rows), total))
    }

    /// Insert a new ingredient
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken, or a database
    /// error otherwise.
    pub async fn create_ingredient(
        &self,
        name: &str,
        calories: f64,
        unit: &str,
    ) -> Result<Ingredient, AppError> {
        let result = sqlx::query("INSERT INTO ingredients (name, calories, unit) VALUES (?, ?, ?)")
            .bind(name)
            .bind(calories)
            .bind(unit)
            .execute(self.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::conflict(format!("Ingredient '{name}' already exists"))
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            calories,
            unit: unit.to_string(),
        })
    }

    /// Fetch one ingredient by id
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_ingredient(&self, ingredient_id: i64) -> Result<Option<Ingredient>, AppError> {
        let ingredient =
            sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = ?")
                .bind(ingredient_id)
                .fetch_optional(self.pool())
                .await?;
        Ok(ingredient)
    }

    /// Partially update an ingredient, keeping unset fields
    ///
    /// Returns the updated row, or `None` if the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the new name is taken, or a database
    /// error otherwise.
    pub async fn update_ingredient(
        &self,
        ingredient_id: i64,
        name: Option<&str>,
        calories: Option<f64>,
        unit: Option<&str>,
    ) -> Result<Option<Ingredient>, AppError> {
        let result = sqlx::query(
            r"
            UPDATE ingredients
            SET name = COALESCE(?, name),
                calories = COALESCE(?, calories),
                unit = COALESCE(?, unit)
            WHERE id = ?
            ",
        )
        .bind(name)
        .bind(calories)
        .bind(unit)
        .bind(ingredient_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Ingredient with this name already exists")
            } else {
                AppError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_ingredient(ingredient_id).await
    }

    /// Delete an ingredient; join rows referencing it cascade away
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_ingredient(&self, ingredient_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?")
            .bind(ingredient_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PER_PAGE;
    use crate::errors::ErrorCode;

    #[tokio::test]
    async fn test_ingredient_crud_round_trip() {
        let db = Database::new_in_memory().await.unwrap();
        let created = db.create_ingredient("Flour", 364.0, "g").await.unwrap();

        let fetched = db.get_ingredient(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Flour");
        assert!((fetched.calories - 364.0).abs() < f64::EPSILON);

        let updated = db
            .update_ingredient(created.id, None, Some(360.0), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Flour");
        assert!((updated.calories - 360.0).abs() < f64::EPSILON);

        assert!(db.delete_ingredient(created.id).await.unwrap());
        assert!(db.get_ingredient(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let db = Database::new_in_memory().await.unwrap();
        db.create_ingredient("Salt", 0.0, "g").await.unwrap();
        let err = db.create_ingredient("Salt", 0.0, "g").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    }

    #[tokio::test]
    async fn test_list_with_filter_and_sort() {
        let db = Database::new_in_memory().await.unwrap();
        db.create_ingredient("Flour", 364.0, "g").await.unwrap();
        db.create_ingredient("Milk", 42.0, "ml").await.unwrap();
        db.create_ingredient("Butter", 717.0, "g").await.unwrap();

        let params = ListParams::parse(
            "calories%5Bgte%5D=100&sort=-calories",
            INGREDIENT_COLUMNS,
            DEFAULT_PER_PAGE,
        );
        let (rows, total) = db.list_ingredients(&params).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0]["name"], "Butter");
        assert_eq!(rows[1]["name"], "Flour");
    }

    #[tokio::test]
    async fn test_list_field_selection() {
        let db = Database::new_in_memory().await.unwrap();
        db.create_ingredient("Flour", 364.0, "g").await.unwrap();

        let params = ListParams::parse("fields=name,unit", INGREDIENT_COLUMNS, DEFAULT_PER_PAGE);
        let (rows, _) = db.list_ingredients(&params).await.unwrap();
        assert_eq!(rows[0], serde_json::json!({"name": "Flour", "unit": "g"}));
    }
}
