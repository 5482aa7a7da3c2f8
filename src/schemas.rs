// ABOUTME: Declarative validation schemas for request payloads
// ABOUTME: Each payload struct validates into a field -> list-of-errors map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! # Validation Schemas
//!
//! Request-body structs with explicit `validate()` methods. Every field is
//! optional at the serde layer so malformed payloads never fail
//! deserialization; missing required fields and constraint violations are
//! collected into a [`FieldErrors`] map and surfaced as a 400 response.
//!
//! Partial (update) schemas share the same constraint checks but treat
//! absent fields as "leave unchanged". Updatable fields are an explicit
//! whitelist; nothing outside these structs ever reaches an entity.

use serde::Deserialize;
use std::sync::OnceLock;

use crate::errors::{AppResult, FieldErrors};
use crate::models::Unit;

const MISSING_FIELD: &str = "Missing data for required field";

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 6;

fn email_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    // Simple mailbox@domain.tld shape; full RFC 5322 is not the goal.
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, cannot fail
        regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    })
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_owned()).or_default().push(message.into());
}

fn check_name(errors: &mut FieldErrors, field: &str, value: &str) {
    let len = value.chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        push_error(
            errors,
            field,
            format!("Length must be between {NAME_MIN} and {NAME_MAX}"),
        );
    }
}

/// Round a non-negative decimal to 2 fractional digits for storage
#[must_use]
pub fn round_decimal(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn finish(errors: FieldErrors) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::errors::AppError::validation(errors))
    }
}

/// Payload for creating an ingredient
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IngredientPayload {
    /// Unique display name
    pub name: Option<String>,
    /// kcal per base quantity
    pub calories: Option<f64>,
    /// Measurement unit (g, ml, pcs)
    pub unit: Option<String>,
}

impl IngredientPayload {
    /// Validate as a full create payload (all fields required)
    pub fn validate_create(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        match &self.name {
            Some(name) => check_name(&mut errors, "name", name),
            None => push_error(&mut errors, "name", MISSING_FIELD),
        }

        match self.calories {
            Some(calories) if calories < 0.0 => {
                push_error(&mut errors, "calories", "Must be greater than or equal to 0");
            }
            Some(_) => {}
            None => push_error(&mut errors, "calories", MISSING_FIELD),
        }

        match &self.unit {
            Some(unit) if Unit::parse(unit).is_none() => {
                push_error(&mut errors, "unit", "Must be one of: g, ml, pcs");
            }
            Some(_) => {}
            None => push_error(&mut errors, "unit", MISSING_FIELD),
        }

        finish(errors)
    }

    /// Validate as a partial update payload (present fields only)
    pub fn validate_partial(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name);
        }
        if let Some(calories) = self.calories {
            if calories < 0.0 {
                push_error(&mut errors, "calories", "Must be greater than or equal to 0");
            }
        }
        if let Some(unit) = &self.unit {
            if Unit::parse(unit).is_none() {
                push_error(&mut errors, "unit", "Must be one of: g, ml, pcs");
            }
        }

        finish(errors)
    }
}

/// One named ingredient entry in a recipe payload
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeIngredientEntry {
    /// Ingredient name, resolved against the catalog at creation time
    pub name: Option<String>,
    /// Non-negative quantity
    pub amount: Option<f64>,
}

/// Payload for creating or updating a recipe
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecipePayload {
    /// Unique display name
    pub name: Option<String>,
    /// Free-text preparation description
    pub description: Option<String>,
    /// Servings yielded (defaults to 1 on create)
    pub servings: Option<i64>,
    /// Named ingredient entries with amounts
    pub ingredients: Option<Vec<RecipeIngredientEntry>>,
}

impl RecipePayload {
    /// Validate as a full create payload
    ///
    /// `servings` is optional and defaults to 1; `ingredients` is required
    /// but may be empty.
    pub fn validate_create(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        match &self.name {
            Some(name) => check_name(&mut errors, "name", name),
            None => push_error(&mut errors, "name", MISSING_FIELD),
        }

        match &self.description {
            Some(description) if description.chars().count() < 2 => {
                push_error(&mut errors, "description", "Shorter than minimum length 2");
            }
            Some(_) => {}
            None => push_error(&mut errors, "description", MISSING_FIELD),
        }

        if let Some(servings) = self.servings {
            if servings < 1 {
                push_error(&mut errors, "servings", "Must be greater than or equal to 1");
            }
        }

        match &self.ingredients {
            Some(entries) => Self::check_entries(&mut errors, entries),
            None => push_error(&mut errors, "ingredients", MISSING_FIELD),
        }

        finish(errors)
    }

    /// Validate as a partial update payload (present fields only)
    pub fn validate_partial(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name);
        }
        if let Some(description) = &self.description {
            if description.chars().count() < 2 {
                push_error(&mut errors, "description", "Shorter than minimum length 2");
            }
        }
        if let Some(servings) = self.servings {
            if servings < 1 {
                push_error(&mut errors, "servings", "Must be greater than or equal to 1");
            }
        }
        if let Some(entries) = &self.ingredients {
            Self::check_entries(&mut errors, entries);
        }

        finish(errors)
    }

    fn check_entries(errors: &mut FieldErrors, entries: &[RecipeIngredientEntry]) {
        for (index, entry) in entries.iter().enumerate() {
            if entry.name.as_ref().is_none_or(|n| n.is_empty()) {
                push_error(errors, &format!("ingredients.{index}.name"), MISSING_FIELD);
            }
            match entry.amount {
                Some(amount) if amount < 0.0 => {
                    push_error(
                        errors,
                        &format!("ingredients.{index}.amount"),
                        "Must be greater than or equal to 0",
                    );
                }
                Some(_) => {}
                None => {
                    push_error(errors, &format!("ingredients.{index}.amount"), MISSING_FIELD);
                }
            }
        }
    }
}

/// Payload for user registration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegisterPayload {
    /// Unique login name
    pub username: Option<String>,
    /// Unique contact address
    pub email: Option<String>,
    /// Raw password, hashed before storage
    pub password: Option<String>,
}

impl RegisterPayload {
    /// Validate registration input
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        match &self.username {
            Some(username) if username.is_empty() => {
                push_error(&mut errors, "username", "Shorter than minimum length 1");
            }
            Some(_) => {}
            None => push_error(&mut errors, "username", MISSING_FIELD),
        }

        match &self.email {
            Some(email) if !email_re().is_match(email) => {
                push_error(&mut errors, "email", "Not a valid email address");
            }
            Some(_) => {}
            None => push_error(&mut errors, "email", MISSING_FIELD),
        }

        check_password(&mut errors, "password", self.password.as_deref());

        finish(errors)
    }
}

/// Payload for login
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginPayload {
    /// Login name
    pub username: Option<String>,
    /// Raw password
    pub password: Option<String>,
}

impl LoginPayload {
    /// Validate login input (presence only; credentials checked later)
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        if self.username.is_none() {
            push_error(&mut errors, "username", MISSING_FIELD);
        }
        if self.password.is_none() {
            push_error(&mut errors, "password", MISSING_FIELD);
        }

        finish(errors)
    }
}

/// Payload for password change
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PasswordUpdatePayload {
    /// Password currently on record
    pub current_password: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

impl PasswordUpdatePayload {
    /// Validate password-change input
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        if self.current_password.is_none() {
            push_error(&mut errors, "current_password", MISSING_FIELD);
        }
        check_password(&mut errors, "new_password", self.new_password.as_deref());

        finish(errors)
    }
}

/// Payload for partial profile update
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProfileUpdatePayload {
    /// New login name, if changing
    pub username: Option<String>,
    /// New contact address, if changing
    pub email: Option<String>,
}

impl ProfileUpdatePayload {
    /// Validate profile-update input; an empty payload is rejected
    pub fn validate(&self) -> AppResult<()> {
        if self.username.is_none() && self.email.is_none() {
            return Err(crate::errors::AppError::invalid_input(
                "No data provided for update",
            ));
        }

        let mut errors = FieldErrors::new();

        if let Some(username) = &self.username {
            if username.is_empty() {
                push_error(&mut errors, "username", "Shorter than minimum length 1");
            }
        }
        if let Some(email) = &self.email {
            if !email_re().is_match(email) {
                push_error(&mut errors, "email", "Not a valid email address");
            }
        }

        finish(errors)
    }
}

fn check_password(errors: &mut FieldErrors, field: &str, password: Option<&str>) {
    match password {
        Some(password) if password.chars().count() < PASSWORD_MIN => {
            push_error(
                errors,
                field,
                format!("Shorter than minimum length {PASSWORD_MIN}"),
            );
        }
        Some(_) => {}
        None => push_error(errors, field, MISSING_FIELD),
    }
}
