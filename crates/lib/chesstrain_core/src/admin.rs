//! User administration, platform statistics and the rating leaderboard.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::auth::User;

/// Default number of entries returned by [`leaderboard`].
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Platform-wide counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub users: i64,
    pub courses: i64,
    pub puzzles: i64,
    pub games: i64,
    pub purchases: i64,
    pub revenue: f64,
}

/// Leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RankedUser {
    pub id: i64,
    pub username: String,
    pub rating: i64,
}

/// All users, newest first.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, is_admin, rating, created_at \
         FROM users ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Grant or revoke admin privileges. Returns whether a row was changed.
pub async fn set_admin(pool: &SqlitePool, user_id: i64, is_admin: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
        .bind(is_admin)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a user. Returns whether a row was removed.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn count(pool: &SqlitePool, table: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
}

/// Counts of users, courses, puzzles, games and purchases, plus total revenue.
pub async fn platform_stats(pool: &SqlitePool) -> Result<PlatformStats, sqlx::Error> {
    let (purchases, revenue) =
        sqlx::query_as::<_, (i64, Option<f64>)>("SELECT COUNT(*), SUM(amount) FROM purchases")
            .fetch_one(pool)
            .await?;

    Ok(PlatformStats {
        users: count(pool, "users").await?,
        courses: count(pool, "courses").await?,
        puzzles: count(pool, "puzzles").await?,
        games: count(pool, "games").await?,
        purchases,
        revenue: revenue.unwrap_or(0.0),
    })
}

/// Top users by rating.
pub async fn leaderboard(pool: &SqlitePool, limit: i64) -> Result<Vec<RankedUser>, sqlx::Error> {
    sqlx::query_as::<_, RankedUser>(
        "SELECT id, username, rating FROM users ORDER BY rating DESC, id LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
