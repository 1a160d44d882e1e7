//! API server configuration.

use chesstrain_core::auth::jwt::TokenSecret;
use chesstrain_core::auth::password::BCRYPT_COST;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8000").
    pub bind_addr: String,
    /// SQLite database file or URL.
    pub database_url: String,
    /// JWT signing secret. Only the token issuer reads it.
    pub token_secret: TokenSecret,
    /// bcrypt cost for newly hashed passwords.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Config for a listener on `host:port` over `database_url`.
    ///
    /// The signing secret comes from `SECRET_KEY` (insecure fallback, logged)
    /// and new passwords use the default bcrypt cost.
    pub fn new(host: &str, port: u16, database_url: impl Into<String>) -> Self {
        Self {
            bind_addr: format!("{host}:{port}"),
            database_url: database_url.into(),
            token_secret: TokenSecret::from_env(),
            bcrypt_cost: BCRYPT_COST,
        }
    }
}
