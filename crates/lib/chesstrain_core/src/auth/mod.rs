//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT issuance/verification, the authorization
//! gate and the user-store queries the API layer builds on.

pub mod gate;
pub mod jwt;
pub mod password;
pub mod queries;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad signature, malformed structure, missing subject or expired token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// No valid identity could be resolved.
    #[error("Could not validate credentials")]
    Unauthorized,

    /// Valid identity without the required privilege.
    #[error("Not enough permissions")]
    Forbidden,

    /// Unexpected failure while checking a password (not a mismatch).
    #[error("Password verification error: {0}")]
    Verification(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
