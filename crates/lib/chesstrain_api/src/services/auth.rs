//! Authentication service: register and login flows delegating to
//! `chesstrain_core::auth`.

use chesstrain_core::auth::jwt::TokenIssuer;
use chesstrain_core::auth::password::{CredentialHasher, verify_password};
use chesstrain_core::auth::queries;
use chesstrain_core::models::auth::User;
use chrono::Duration;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, LOGIN_FAILED_MESSAGE};
use crate::models::{RegisterRequest, RegisterResponse, TokenResponse};

/// Lifetime of tokens issued at login: 30 minutes.
///
/// Passed explicitly; the issuer's own default is shorter.
pub fn access_token_ttl() -> Duration {
    Duration::minutes(30)
}

/// Structural email check: `local@domain.tld`, no whitespace, and no empty
/// dot-separated labels on either side of the `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }
    let labels_ok = |part: &str| !part.is_empty() && part.split('.').all(|label| !label.is_empty());
    labels_ok(local) && labels_ok(domain) && domain.contains('.')
}

/// Register a new user account.
pub async fn register(
    pool: &SqlitePool,
    hasher: &CredentialHasher,
    request: &RegisterRequest,
) -> AppResult<RegisterResponse> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if !is_valid_email(&request.email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    if queries::username_or_email_exists(pool, &request.username, &request.email).await? {
        return Err(AppError::Validation(
            "Username or email already registered".into(),
        ));
    }

    let password_hash = hasher.hash(&request.password)?;
    let user_id =
        queries::create_user(pool, &request.username, &request.email, &password_hash).await?;

    info!(username = %request.username, user_id, "user registered");

    Ok(RegisterResponse {
        message: "User created successfully".into(),
        user_id,
    })
}

/// Check a username/password pair against the store.
///
/// Unknown users and wrong passwords both yield `None`.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> AppResult<Option<User>> {
    let Some(credential) = queries::find_user_by_username(pool, username).await? else {
        debug!(%username, "login for unknown user");
        return Ok(None);
    };

    if !verify_password(password, &credential.password_hash) {
        debug!(%username, "login with wrong password");
        return Ok(None);
    }

    Ok(Some(credential.user))
}

/// Authenticate and issue a 30-minute bearer token.
pub async fn login(
    pool: &SqlitePool,
    issuer: &TokenIssuer,
    username: &str,
    password: &str,
) -> AppResult<TokenResponse> {
    let user = authenticate(pool, username, password)
        .await?
        .ok_or_else(|| AppError::Unauthorized(LOGIN_FAILED_MESSAGE.into()))?;

    let access_token = issuer.issue_for(&user.username, Some(access_token_ttl()))?;

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    })
}
