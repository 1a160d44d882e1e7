//! Authentication middleware: bearer token extraction, user resolution and
//! the admin gate.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chesstrain_core::auth::gate;
use chesstrain_core::models::auth::AuthenticatedUser;

use crate::AppState;
use crate::error::{AppError, CREDENTIALS_MESSAGE};

/// Token from an `Authorization: Bearer <token>` header (scheme is case-insensitive).
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Axum middleware: verifies the bearer token, loads the user it names and
/// injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_MESSAGE.into()))?
        .to_string();

    let user = gate::current_user(&state.issuer, &state.pool, &token).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum middleware: admits only admins. Must run after [`require_auth`].
pub async fn require_admin(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions_mut()
        .remove::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_MESSAGE.into()))?;

    let admin = gate::require_admin(user)?;
    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}
