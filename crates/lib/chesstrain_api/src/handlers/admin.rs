//! Admin handlers and the public leaderboard.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chesstrain_core::admin::{self, DEFAULT_LEADERBOARD_LIMIT, PlatformStats, RankedUser};
use chesstrain_core::models::auth::{AuthenticatedUser, User};
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{AdminFlagQuery, LimitQuery, MessageResponse};

const NOT_FOUND: &str = "User not found";

/// `GET /admin/users`
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(admin::list_users(&state.pool).await?))
}

/// `PUT /admin/users/{id}/admin?is_admin=`
pub async fn set_admin_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Query(query): Query<AdminFlagQuery>,
) -> AppResult<Json<MessageResponse>> {
    if !admin::set_admin(&state.pool, id, query.is_admin).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    info!(actor = actor.user().id, user_id = id, is_admin = query.is_admin, "admin flag changed");
    Ok(Json(MessageResponse::new("User admin status updated")))
}

/// `DELETE /admin/users/{id}`: an admin cannot remove their own account.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if actor.user().id == id {
        return Err(AppError::Validation("Cannot delete yourself".into()));
    }
    if !admin::delete_user(&state.pool, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    info!(actor = actor.user().id, user_id = id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted")))
}

/// `GET /admin/stats`
pub async fn stats_handler(State(state): State<AppState>) -> AppResult<Json<PlatformStats>> {
    Ok(Json(admin::platform_stats(&state.pool).await?))
}

/// `GET /admin/leaderboard?limit=` (public)
pub async fn leaderboard_handler(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<RankedUser>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(admin::leaderboard(&state.pool, limit).await?))
}
