//! Puzzle catalog and puzzle-attempt persistence.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Number of attempts returned by [`list_attempts`].
pub const RECENT_ATTEMPTS_LIMIT: i64 = 50;

/// Row returned by puzzle queries.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PuzzleRow {
    pub id: i64,
    pub title: String,
    pub fen: String,
    pub solution: String,
    pub difficulty: String,
    pub category_id: Option<i64>,
    pub rating: i64,
    pub created_at: NaiveDateTime,
}

/// Fields supplied when creating or updating a puzzle.
#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleInput {
    pub title: String,
    /// Starting position in Forsyth-Edwards Notation.
    pub fen: String,
    pub solution: String,
    #[serde(default = "default_puzzle_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default = "default_puzzle_rating")]
    pub rating: i64,
}

fn default_puzzle_difficulty() -> String {
    "easy".to_string()
}

fn default_puzzle_rating() -> i64 {
    1200
}

/// A user's attempt, joined with the puzzle's title and difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: i64,
    pub puzzle_id: i64,
    pub success: Option<bool>,
    pub time_taken: Option<i64>,
    pub created_at: NaiveDateTime,
    pub puzzle_title: String,
    pub difficulty: String,
}

/// Fields supplied when submitting an attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct AttemptInput {
    pub puzzle_id: i64,
    pub success: bool,
    #[serde(default)]
    pub time_taken: Option<i64>,
}

const PUZZLE_COLUMNS: &str =
    "id, title, fen, solution, difficulty, category_id, rating, created_at";

/// List puzzles ordered by rating, optionally filtered by difficulty.
pub async fn list_puzzles(
    pool: &SqlitePool,
    difficulty: Option<&str>,
) -> Result<Vec<PuzzleRow>, sqlx::Error> {
    match difficulty {
        Some(difficulty) => {
            let sql = format!(
                "SELECT {PUZZLE_COLUMNS} FROM puzzles WHERE difficulty = ? ORDER BY rating, id"
            );
            sqlx::query_as::<_, PuzzleRow>(&sql)
                .bind(difficulty)
                .fetch_all(pool)
                .await
        }
        None => {
            let sql = format!("SELECT {PUZZLE_COLUMNS} FROM puzzles ORDER BY rating, id");
            sqlx::query_as::<_, PuzzleRow>(&sql).fetch_all(pool).await
        }
    }
}

/// Get a puzzle by ID.
pub async fn get_puzzle(pool: &SqlitePool, puzzle_id: i64) -> Result<Option<PuzzleRow>, sqlx::Error> {
    let sql = format!("SELECT {PUZZLE_COLUMNS} FROM puzzles WHERE id = ?");
    sqlx::query_as::<_, PuzzleRow>(&sql)
        .bind(puzzle_id)
        .fetch_optional(pool)
        .await
}

/// Create a puzzle, returning its ID.
pub async fn create_puzzle(pool: &SqlitePool, input: &PuzzleInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO puzzles (title, fen, solution, difficulty, category_id, rating) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.fen)
    .bind(&input.solution)
    .bind(&input.difficulty)
    .bind(input.category_id)
    .bind(input.rating)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Update a puzzle. Returns whether a row was changed.
pub async fn update_puzzle(
    pool: &SqlitePool,
    puzzle_id: i64,
    input: &PuzzleInput,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE puzzles
        SET title = ?, fen = ?, solution = ?, difficulty = ?, category_id = ?, rating = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.fen)
    .bind(&input.solution)
    .bind(&input.difficulty)
    .bind(input.category_id)
    .bind(input.rating)
    .bind(puzzle_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a puzzle. Returns whether a row was removed.
pub async fn delete_puzzle(pool: &SqlitePool, puzzle_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM puzzles WHERE id = ?")
        .bind(puzzle_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Record a puzzle attempt, returning its ID.
pub async fn create_attempt(
    pool: &SqlitePool,
    user_id: i64,
    input: &AttemptInput,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO puzzle_attempts (user_id, puzzle_id, success, time_taken) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(input.puzzle_id)
    .bind(input.success)
    .bind(input.time_taken)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// A user's most recent attempts, newest first.
pub async fn list_attempts(pool: &SqlitePool, user_id: i64) -> Result<Vec<AttemptRow>, sqlx::Error> {
    sqlx::query_as::<_, AttemptRow>(
        r#"
        SELECT pa.id, pa.user_id, pa.puzzle_id, pa.success, pa.time_taken, pa.created_at,
               p.title AS puzzle_title, p.difficulty
        FROM puzzle_attempts pa
        JOIN puzzles p ON pa.puzzle_id = p.id
        WHERE pa.user_id = ?
        ORDER BY pa.created_at DESC, pa.id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(RECENT_ATTEMPTS_LIMIT)
    .fetch_all(pool)
    .await
}
