//! Game log handlers.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use chesstrain_core::games::{self, DEFAULT_GAMES_LIMIT, GameInput, GameRow};
use chesstrain_core::models::auth::AuthenticatedUser;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{ActivityStats, CreatedResponse, LimitQuery};
use crate::services::activity;

/// `POST /games`: log a game and apply its rating change.
pub async fn create_game_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<GameInput>,
) -> AppResult<Json<CreatedResponse>> {
    let id = activity::record_game(&state.pool, user.user(), &body).await?;
    Ok(Json(CreatedResponse::new("Game recorded", id)))
}

/// `GET /games/my?limit=`
pub async fn my_games_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<GameRow>>> {
    let limit = query.limit.unwrap_or(DEFAULT_GAMES_LIMIT);
    Ok(Json(games::list_games(&state.pool, user.user().id, limit).await?))
}

/// `GET /games/stats`
pub async fn stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ActivityStats>> {
    let user = user.user();
    Ok(Json(ActivityStats {
        games: games::game_stats(&state.pool, user.id).await?,
        puzzles: games::puzzle_stats(&state.pool, user.id).await?,
        rating: user.rating,
    }))
}
