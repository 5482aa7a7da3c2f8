// ABOUTME: User account queries: registration, lookup, profile and password updates
// ABOUTME: Uniqueness conflicts surface as AppError::conflict for the routes layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

use super::{is_unique_violation, Database};
use crate::errors::AppError;
use crate::models::User;
use chrono::Utc;

impl Database {
    /// Insert a new user with an already-hashed password
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the username or email is taken, or a
    /// database error otherwise.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let creation_date = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (username, email, password, creation_date)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(creation_date.to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("User with this username or email already exists")
            } else {
                AppError::from(e)
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            creation_date,
        })
    }

    /// Look up a user by username
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Update a user's username and/or email, keeping unset fields
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the new username or email is taken,
    /// or a database error otherwise.
    pub async fn update_user_profile(
        &self,
        user_id: i64,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r"
            UPDATE users
            SET username = COALESCE(?, username),
                email = COALESCE(?, email)
            WHERE id = ?
            ",
        )
        .bind(username)
        .bind(email)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Username or email already in use")
            } else {
                AppError::from(e)
            }
        })?;
        Ok(())
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    pub async fn update_user_password(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
