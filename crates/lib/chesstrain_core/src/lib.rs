//! # chesstrain_core
//!
//! Core domain logic for the chess training platform: the authentication
//! core, the SQLite store and the catalog, activity and rating queries.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod db;
pub mod games;
pub mod models;
pub mod puzzles;
pub mod rating;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
