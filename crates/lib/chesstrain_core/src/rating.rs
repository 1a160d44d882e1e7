//! Rating adjustments for recorded games and solved puzzles.

use sqlx::SqlitePool;

/// Points gained for a won game.
pub const WIN_DELTA: i64 = 20;
/// Points lost for a lost game.
pub const LOSS_DELTA: i64 = -15;
/// Points gained for a drawn game.
pub const DRAW_DELTA: i64 = 5;
/// Points gained for a solved puzzle.
pub const PUZZLE_SOLVED_DELTA: i64 = 10;

/// Rating change for a game result. Unknown results change nothing.
pub fn game_delta(result: &str) -> i64 {
    match result {
        "win" => WIN_DELTA,
        "loss" => LOSS_DELTA,
        "draw" => DRAW_DELTA,
        _ => 0,
    }
}

/// New rating after a game; never drops below zero.
pub fn after_game(current: i64, delta: i64) -> i64 {
    (current + delta).max(0)
}

/// New rating after solving a puzzle.
pub fn after_puzzle_solved(current: i64) -> i64 {
    current + PUZZLE_SOLVED_DELTA
}

/// Store a user's new rating and append the change to their history.
pub async fn record_change(
    pool: &SqlitePool,
    user_id: i64,
    new_rating: i64,
    change: i64,
    reason: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET rating = ? WHERE id = ?")
        .bind(new_rating)
        .bind(user_id)
        .execute(pool)
        .await?;

    sqlx::query("INSERT INTO rating_history (user_id, rating, change, reason) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(new_rating)
        .bind(change)
        .bind(reason)
        .execute(pool)
        .await?;

    Ok(())
}
