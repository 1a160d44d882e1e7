//! Request and response shapes of the HTTP API.

use chesstrain_core::games::{GameStats, PuzzleStats};
use serde::{Deserialize, Serialize};

/// Error body returned by every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

/// `POST /auth/token` form (OAuth2 password flow).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Bearer token issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement carrying the ID of a created row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

impl CreatedResponse {
    pub fn new(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id,
        }
    }
}

/// `POST /courses/purchase/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub message: String,
    pub purchase_id: i64,
}

/// `POST /puzzles/attempt` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResponse {
    pub message: String,
    pub success: bool,
}

/// `GET /games/stats` response.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityStats {
    pub games: GameStats,
    pub puzzles: PuzzleStats,
    pub rating: i64,
}

/// `?difficulty=` filter for puzzle listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PuzzleFilter {
    pub difficulty: Option<String>,
}

/// `?limit=` for bounded listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// `?is_admin=` for the admin toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminFlagQuery {
    pub is_admin: bool,
}
