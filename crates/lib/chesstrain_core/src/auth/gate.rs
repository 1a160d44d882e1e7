//! Authorization gate. Resolves bearer tokens to users and checks privileges.
//!
//! Every check runs per request; nothing here caches identities or decisions.

use async_trait::async_trait;
use tracing::debug;

use super::AuthError;
use super::jwt::TokenIssuer;
use crate::models::auth::{AuthenticatedUser, StoredCredential};

/// Lookup side of the user store needed by the gate.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredCredential>, AuthError>;
}

/// Resolve a bearer token to the user it names.
///
/// Fails with `Unauthorized` when the token is invalid or expired, or when
/// its subject no longer exists. Store errors propagate unchanged.
pub async fn current_user<S>(
    issuer: &TokenIssuer,
    store: &S,
    token: &str,
) -> Result<AuthenticatedUser, AuthError>
where
    S: UserStore + ?Sized,
{
    let claims = issuer.verify(token).map_err(|e| {
        debug!(error = %e, "rejected bearer token");
        AuthError::Unauthorized
    })?;

    match store.find_by_username(&claims.sub).await? {
        Some(credential) => Ok(AuthenticatedUser(credential.user)),
        None => {
            debug!(username = %claims.sub, "token subject not found");
            Err(AuthError::Unauthorized)
        }
    }
}

/// Pass `user` through if it holds admin privileges, otherwise `Forbidden`.
pub fn require_admin(user: AuthenticatedUser) -> Result<AuthenticatedUser, AuthError> {
    if user.0.is_admin {
        Ok(user)
    } else {
        Err(AuthError::Forbidden)
    }
}
