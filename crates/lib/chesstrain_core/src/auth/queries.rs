//! Auth-related database queries.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::AuthError;
use super::gate::UserStore;
use crate::models::auth::{StoredCredential, User};

/// Fetch a user and their password hash by username.
pub async fn find_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<StoredCredential>, AuthError> {
    let row = sqlx::query_as::<_, (i64, String, String, bool, i64, chrono::NaiveDateTime, String)>(
        "SELECT id, username, email, is_admin, rating, created_at, hashed_password \
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, username, email, is_admin, rating, created_at, password_hash)| StoredCredential {
            user: User {
                id,
                username,
                email,
                is_admin,
                rating,
                created_at,
            },
            password_hash,
        },
    ))
}

/// Fetch a user by ID.
pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, AuthError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, is_admin, rating, created_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Check whether a username or email is already registered.
pub async fn username_or_email_exists(
    pool: &SqlitePool,
    username: &str,
    email: &str,
) -> Result<bool, AuthError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Create a new user, returning the user ID.
///
/// A concurrent registration of the same username or email loses on the
/// table's UNIQUE constraints and is reported as a validation error.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, AuthError> {
    let result = sqlx::query("INSERT INTO users (username, email, hashed_password) VALUES (?, ?, ?)")
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AuthError::Validation(
            "Username or email already registered".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl UserStore for SqlitePool {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredCredential>, AuthError> {
        find_user_by_username(self, username).await
    }
}
