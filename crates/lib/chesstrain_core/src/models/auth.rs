//! Authentication domain models.
//!
//! These are internal domain models; API request/response shapes live in
//! `chesstrain_api::models`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored user record, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub rating: i64,
    pub created_at: NaiveDateTime,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub user: User,
    pub password_hash: String,
}

/// User resolved from a bearer token for the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_user(self) -> User {
        self.0
    }
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the username.
    pub sub: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Any further claims supplied at issue time.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
