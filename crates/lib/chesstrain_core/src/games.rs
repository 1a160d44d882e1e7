//! Game records and per-user play statistics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Default number of games returned by [`list_games`].
pub const DEFAULT_GAMES_LIMIT: i64 = 20;

/// Row returned by game queries.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct GameRow {
    pub id: i64,
    pub user_id: i64,
    pub game_type: String,
    pub result: Option<String>,
    pub moves: Option<String>,
    pub duration: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// Fields supplied when recording a game.
#[derive(Debug, Clone, Deserialize)]
pub struct GameInput {
    pub game_type: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub moves: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Aggregate game outcomes. Sums are `None` when the user has no games.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct GameStats {
    pub total_games: i64,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub draws: Option<i64>,
}

/// Aggregate puzzle outcomes. `successful` is `None` when there are no attempts.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PuzzleStats {
    pub total_attempts: i64,
    pub successful: Option<i64>,
}

/// Record a game, returning its ID.
pub async fn create_game(pool: &SqlitePool, user_id: i64, input: &GameInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO games (user_id, game_type, result, moves, duration) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&input.game_type)
    .bind(&input.result)
    .bind(&input.moves)
    .bind(input.duration)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// A user's games, newest first.
pub async fn list_games(pool: &SqlitePool, user_id: i64, limit: i64) -> Result<Vec<GameRow>, sqlx::Error> {
    sqlx::query_as::<_, GameRow>(
        r#"
        SELECT id, user_id, game_type, result, moves, duration, created_at
        FROM games
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Win/loss/draw counts for a user.
pub async fn game_stats(pool: &SqlitePool, user_id: i64) -> Result<GameStats, sqlx::Error> {
    sqlx::query_as::<_, GameStats>(
        r#"
        SELECT
            COUNT(*) AS total_games,
            SUM(CASE WHEN result = 'win' THEN 1 ELSE 0 END) AS wins,
            SUM(CASE WHEN result = 'loss' THEN 1 ELSE 0 END) AS losses,
            SUM(CASE WHEN result = 'draw' THEN 1 ELSE 0 END) AS draws
        FROM games
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Attempt counts for a user.
pub async fn puzzle_stats(pool: &SqlitePool, user_id: i64) -> Result<PuzzleStats, sqlx::Error> {
    sqlx::query_as::<_, PuzzleStats>(
        r#"
        SELECT
            COUNT(*) AS total_attempts,
            SUM(CASE WHEN success = 1 THEN 1 ELSE 0 END) AS successful
        FROM puzzle_attempts
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
