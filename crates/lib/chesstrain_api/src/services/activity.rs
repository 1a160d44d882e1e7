//! Game and puzzle logging with the rating updates they trigger.

use chesstrain_core::games::{self, GameInput};
use chesstrain_core::models::auth::User;
use chesstrain_core::puzzles::{self, AttemptInput};
use chesstrain_core::rating;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::AppResult;

/// Record a finished game and adjust the player's rating for its result.
///
/// The new rating is computed from `user.rating` as loaded at request time.
pub async fn record_game(pool: &SqlitePool, user: &User, input: &GameInput) -> AppResult<i64> {
    let game_id = games::create_game(pool, user.id, input).await?;

    if let Some(result) = input.result.as_deref() {
        let delta = rating::game_delta(result);
        if delta != 0 {
            let new_rating = rating::after_game(user.rating, delta);
            let reason = format!("{} - {}", input.game_type, result);
            rating::record_change(pool, user.id, new_rating, delta, &reason).await?;
            debug!(user_id = user.id, game_id, delta, new_rating, "rating updated after game");
        }
    }

    Ok(game_id)
}

/// Record a puzzle attempt; a solved puzzle earns rating points.
pub async fn record_attempt(
    pool: &SqlitePool,
    user: &User,
    input: &AttemptInput,
) -> AppResult<i64> {
    let attempt_id = puzzles::create_attempt(pool, user.id, input).await?;

    if input.success {
        let new_rating = rating::after_puzzle_solved(user.rating);
        let reason = format!("Solved puzzle {}", input.puzzle_id);
        rating::record_change(pool, user.id, new_rating, rating::PUZZLE_SOLVED_DELTA, &reason)
            .await?;
        debug!(user_id = user.id, attempt_id, new_rating, "rating updated after puzzle");
    }

    Ok(attempt_id)
}

#[cfg(test)]
mod tests {
    use chesstrain_core::auth::queries;
    use chesstrain_core::db;

    use super::*;

    async fn player(pool: &SqlitePool, rating: i64) -> User {
        let id = queries::create_user(pool, "kasparov", "garry@example.com", "x")
            .await
            .unwrap();
        sqlx::query("UPDATE users SET rating = ? WHERE id = ?")
            .bind(rating)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
        queries::find_user_by_username(pool, "kasparov")
            .await
            .unwrap()
            .unwrap()
            .user
    }

    async fn stored_rating(pool: &SqlitePool, user_id: i64) -> i64 {
        sqlx::query_scalar("SELECT rating FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn reasons(pool: &SqlitePool, user_id: i64) -> Vec<(i64, String)> {
        sqlx::query_as("SELECT change, reason FROM rating_history WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await
            .unwrap()
    }

    fn game(result: Option<&str>) -> GameInput {
        GameInput {
            game_type: "blitz".into(),
            result: result.map(str::to_string),
            moves: Some("e4 e5".into()),
            duration: Some(300),
        }
    }

    #[tokio::test]
    async fn win_adds_twenty_and_logs_reason() {
        let pool = db::memory_pool().await.unwrap();
        let user = player(&pool, 1200).await;

        record_game(&pool, &user, &game(Some("win"))).await.unwrap();

        assert_eq!(stored_rating(&pool, user.id).await, 1220);
        assert_eq!(reasons(&pool, user.id).await, vec![(20, "blitz - win".to_string())]);
    }

    #[tokio::test]
    async fn loss_is_clamped_at_zero() {
        let pool = db::memory_pool().await.unwrap();
        let user = player(&pool, 10).await;

        record_game(&pool, &user, &game(Some("loss"))).await.unwrap();

        assert_eq!(stored_rating(&pool, user.id).await, 0);
        assert_eq!(reasons(&pool, user.id).await, vec![(-15, "blitz - loss".to_string())]);
    }

    #[tokio::test]
    async fn unrated_results_leave_no_history() {
        let pool = db::memory_pool().await.unwrap();
        let user = player(&pool, 1200).await;

        record_game(&pool, &user, &game(None)).await.unwrap();
        record_game(&pool, &user, &game(Some("abandoned"))).await.unwrap();

        assert_eq!(stored_rating(&pool, user.id).await, 1200);
        assert!(reasons(&pool, user.id).await.is_empty());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games WHERE user_id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn solved_puzzle_earns_ten() {
        let pool = db::memory_pool().await.unwrap();
        let user = player(&pool, 1500).await;

        let solved = AttemptInput {
            puzzle_id: 7,
            success: true,
            time_taken: Some(42),
        };
        record_attempt(&pool, &user, &solved).await.unwrap();
        assert_eq!(stored_rating(&pool, user.id).await, 1510);

        let failed = AttemptInput {
            success: false,
            ..solved
        };
        let user = queries::get_user_by_id(&pool, user.id).await.unwrap().unwrap();
        record_attempt(&pool, &user, &failed).await.unwrap();
        assert_eq!(stored_rating(&pool, user.id).await, 1510);
        assert_eq!(reasons(&pool, user.id).await, vec![(10, "Solved puzzle 7".to_string())]);
    }
}
