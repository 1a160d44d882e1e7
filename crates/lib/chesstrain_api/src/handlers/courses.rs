//! Course catalog and purchase handlers.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chesstrain_core::catalog::{self, CourseInput, CourseRow, PurchasedCourseRow};
use chesstrain_core::models::auth::AuthenticatedUser;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreatedResponse, MessageResponse, PurchaseResponse};

const NOT_FOUND: &str = "Course not found";

/// `GET /courses`
pub async fn list_courses_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CourseRow>>> {
    Ok(Json(catalog::list_courses(&state.pool).await?))
}

/// `GET /courses/{id}`
pub async fn get_course_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CourseRow>> {
    catalog::get_course(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

/// `POST /courses` (admin)
pub async fn create_course_handler(
    State(state): State<AppState>,
    Json(body): Json<CourseInput>,
) -> AppResult<Json<CreatedResponse>> {
    let id = catalog::create_course(&state.pool, &body).await?;
    Ok(Json(CreatedResponse::new("Course created", id)))
}

/// `PUT /courses/{id}` (admin)
pub async fn update_course_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CourseInput>,
) -> AppResult<Json<MessageResponse>> {
    if !catalog::update_course(&state.pool, id, &body).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Course updated")))
}

/// `DELETE /courses/{id}` (admin)
pub async fn delete_course_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !catalog::delete_course(&state.pool, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Course deleted")))
}

/// `POST /courses/purchase/{id}`: buy a course at its listed price.
pub async fn purchase_course_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<PurchaseResponse>> {
    let course = catalog::get_course(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

    let user = user.user();
    if catalog::has_purchased(&state.pool, user.id, course.id).await? {
        return Err(AppError::Validation("Course already purchased".into()));
    }

    let purchase_id = catalog::create_purchase(&state.pool, user.id, course.id, course.price).await?;
    info!(user_id = user.id, course_id = course.id, purchase_id, "course purchased");

    Ok(Json(PurchaseResponse {
        message: "Course purchased successfully".into(),
        purchase_id,
    }))
}

/// `GET /courses/my/purchases`
pub async fn my_purchases_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<PurchasedCourseRow>>> {
    Ok(Json(catalog::list_purchases(&state.pool, user.user().id).await?))
}
