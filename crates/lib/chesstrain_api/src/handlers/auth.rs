//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Form, Json};
use chesstrain_core::models::auth::{AuthenticatedUser, User};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LoginForm, RegisterRequest, RegisterResponse, TokenResponse};
use crate::services::auth;

/// `POST /auth/register`: create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let resp = auth::register(&state.pool, &state.hasher, &body).await?;
    Ok(Json(resp))
}

/// `POST /auth/token`: OAuth2 password flow, form encoded.
pub async fn token_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(&state.pool, &state.issuer, &form.username, &form.password).await?;
    Ok(Json(resp))
}

/// `GET /auth/me`
pub async fn me_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<User> {
    Json(user.into_user())
}
