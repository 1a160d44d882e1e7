//! Business logic behind the handlers.

pub mod activity;
pub mod auth;
