// ABOUTME: Persistence entities for the food planner catalog
// ABOUTME: Defines Ingredient, Recipe, RecipeIngredient, and User row types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! # Data Models
//!
//! Relational entities backing the catalog. Surrogate integer keys are
//! assigned by the store; uniqueness of ingredient/recipe names and user
//! username/email is enforced at the store level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Measurement unit for an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Grams
    #[default]
    G,
    /// Milliliters
    Ml,
    /// Pieces
    Pcs,
}

impl Unit {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Ml => "ml",
            Self::Pcs => "pcs",
        }
    }

    /// Parse from database string representation
    ///
    /// Returns `None` for anything outside the g/ml/pcs enum; input
    /// validation rejects such values before they reach the store.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "g" => Some(Self::G),
            "ml" => Some(Self::Ml),
            "pcs" => Some(Self::Pcs),
            _ => None,
        }
    }
}

/// A catalog ingredient with energy density per base quantity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    /// Surrogate key
    pub id: i64,
    /// Unique display name (2-50 chars)
    pub name: String,
    /// kcal per 100 g / 100 ml / 1 pc, non-negative, 2 fractional digits
    pub calories: f64,
    /// Measurement unit as stored (g, ml, pcs)
    pub unit: String,
}

/// A recipe owning a collection of ingredient join rows
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    /// Surrogate key
    pub id: i64,
    /// Unique display name (2-50 chars)
    pub name: String,
    /// Free-text preparation description
    pub description: String,
    /// Number of servings the recipe yields (>= 1)
    pub servings: i64,
}

/// Join row: "this much of this ingredient in this recipe"
///
/// Owned exclusively by its recipe; deleting the recipe deletes the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    /// Owning recipe
    pub recipe_id: i64,
    /// Referenced ingredient (non-owning)
    pub ingredient_id: i64,
    /// Non-negative quantity in the ingredient's unit
    pub amount: f64,
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Surrogate key
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Unique contact address
    pub email: String,
    /// Salted bcrypt hash, never the raw password
    #[serde(skip_serializing)]
    pub password: String,
    /// Set once at creation, UTC
    pub creation_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_round_trip() {
        for unit in [Unit::G, Unit::Ml, Unit::Pcs] {
            assert_eq!(Unit::parse(unit.as_str()), Some(unit));
        }
        assert_eq!(Unit::parse("kg"), None);
    }

    #[test]
    fn test_user_serialization_omits_password() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "alice@x.com".into(),
            password: "$2b$12$hash".into(),
            creation_date: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
    }
}
