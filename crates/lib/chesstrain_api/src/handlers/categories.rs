//! Category handlers.

use axum::Json;
use axum::extract::{Path, State};
use chesstrain_core::catalog::{self, CategoryInput, CategoryRow};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreatedResponse, MessageResponse};

const NOT_FOUND: &str = "Category not found";

/// `GET /categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryRow>>> {
    Ok(Json(catalog::list_categories(&state.pool).await?))
}

/// `GET /categories/{id}`
pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CategoryRow>> {
    catalog::get_category(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

/// `POST /categories` (admin)
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(body): Json<CategoryInput>,
) -> AppResult<Json<CreatedResponse>> {
    let id = catalog::create_category(&state.pool, &body).await?;
    Ok(Json(CreatedResponse::new("Category created", id)))
}

/// `PUT /categories/{id}` (admin)
pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryInput>,
) -> AppResult<Json<MessageResponse>> {
    if !catalog::update_category(&state.pool, id, &body).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Category updated")))
}

/// `DELETE /categories/{id}` (admin)
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !catalog::delete_category(&state.pool, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Category deleted")))
}
