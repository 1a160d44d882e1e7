//! JWT token issuance and verification.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};
use tracing::warn;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Environment variable holding the signing secret.
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";

/// Insecure secret used when `SECRET_KEY` is unset. Must be overridden in production.
pub const FALLBACK_SECRET: &str = "your-secret-key-here";

/// Lifetime applied by [`TokenIssuer::issue`] when the caller passes none.
///
/// Login passes its own 30-minute lifetime; this default only applies to
/// callers that omit one.
pub fn default_token_ttl() -> Duration {
    Duration::minutes(15)
}

/// HS256 signing secret, resolved once at startup.
#[derive(Clone)]
pub struct TokenSecret {
    value: String,
    fallback: bool,
}

impl TokenSecret {
    /// Explicit secret (tests, tooling).
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fallback: false,
        }
    }

    /// Resolve the secret from `SECRET_KEY`, falling back to the insecure default.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(SECRET_KEY_ENV).ok())
    }

    fn resolve(value: Option<String>) -> Self {
        match value {
            Some(value) if !value.is_empty() => Self::new(value),
            _ => {
                warn!(
                    env = SECRET_KEY_ENV,
                    "signing secret not configured, using insecure default"
                );
                Self {
                    value: FALLBACK_SECRET.to_string(),
                    fallback: true,
                }
            }
        }
    }

    /// Whether the insecure default is in effect.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecret")
            .field("value", &"<redacted>")
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Issues and verifies signed, time-limited bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &TokenSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.value.as_bytes()),
            decoding: DecodingKey::from_secret(secret.value.as_bytes()),
            validation,
        }
    }

    /// Sign `claims` with an `exp` of now + `ttl` (15 minutes when `None`).
    pub fn issue(&self, claims: Map<String, Value>, ttl: Option<Duration>) -> Result<String, AuthError> {
        self.issue_at(claims, ttl, Utc::now())
    }

    /// Like [`issue`](Self::issue) with an explicit issue instant.
    pub fn issue_at(
        &self,
        mut claims: Map<String, Value>,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = now + ttl.unwrap_or_else(default_token_ttl);
        claims.insert("exp".into(), expires_at.timestamp().into());
        claims
            .entry("iat")
            .or_insert_with(|| now.timestamp().into());
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Issue a token whose subject is `username`.
    pub fn issue_for(&self, username: &str, ttl: Option<Duration>) -> Result<String, AuthError> {
        let mut claims = Map::new();
        claims.insert("sub".into(), Value::String(username.to_string()));
        self.issue(claims, ttl)
    }

    /// Verify signature, structure, expiry and presence of `sub`.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
