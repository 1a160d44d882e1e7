//! Puzzle handlers.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chesstrain_core::models::auth::AuthenticatedUser;
use chesstrain_core::puzzles::{self, AttemptInput, AttemptRow, PuzzleInput, PuzzleRow};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{AttemptResponse, CreatedResponse, MessageResponse, PuzzleFilter};
use crate::services::activity;

const NOT_FOUND: &str = "Puzzle not found";

/// `GET /puzzles?difficulty=`
pub async fn list_puzzles_handler(
    State(state): State<AppState>,
    Query(filter): Query<PuzzleFilter>,
) -> AppResult<Json<Vec<PuzzleRow>>> {
    let rows = puzzles::list_puzzles(&state.pool, filter.difficulty.as_deref()).await?;
    Ok(Json(rows))
}

/// `GET /puzzles/{id}`
pub async fn get_puzzle_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PuzzleRow>> {
    puzzles::get_puzzle(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

/// `POST /puzzles` (admin)
pub async fn create_puzzle_handler(
    State(state): State<AppState>,
    Json(body): Json<PuzzleInput>,
) -> AppResult<Json<CreatedResponse>> {
    let id = puzzles::create_puzzle(&state.pool, &body).await?;
    Ok(Json(CreatedResponse::new("Puzzle created", id)))
}

/// `PUT /puzzles/{id}` (admin)
pub async fn update_puzzle_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PuzzleInput>,
) -> AppResult<Json<MessageResponse>> {
    if !puzzles::update_puzzle(&state.pool, id, &body).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Puzzle updated")))
}

/// `DELETE /puzzles/{id}` (admin)
pub async fn delete_puzzle_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !puzzles::delete_puzzle(&state.pool, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Puzzle deleted")))
}

/// `POST /puzzles/attempt`
pub async fn attempt_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<AttemptInput>,
) -> AppResult<Json<AttemptResponse>> {
    activity::record_attempt(&state.pool, user.user(), &body).await?;
    Ok(Json(AttemptResponse {
        message: "Attempt recorded".into(),
        success: body.success,
    }))
}

/// `GET /puzzles/my/attempts`: the most recent attempts.
pub async fn my_attempts_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<AttemptRow>>> {
    Ok(Json(puzzles::list_attempts(&state.pool, user.user().id).await?))
}
