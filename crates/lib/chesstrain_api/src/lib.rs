//! # chesstrain_api
//!
//! HTTP API library for the chess training platform.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::routing::{get, post, put};
use chesstrain_core::auth::jwt::TokenIssuer;
use chesstrain_core::auth::password::CredentialHasher;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, categories, courses, games, puzzles};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool.
    pub pool: SqlitePool,
    /// API configuration.
    pub config: ApiConfig,
    /// Signs and verifies access tokens.
    pub issuer: TokenIssuer,
    /// Hashes passwords at registration.
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: ApiConfig) -> Self {
        let issuer = TokenIssuer::new(&config.token_secret);
        let hasher = CredentialHasher::with_cost(config.bcrypt_cost);
        Self {
            pool,
            config,
            issuer,
            hasher,
        }
    }
}

/// Create the schema if it does not exist yet.
///
/// Delegates to `chesstrain_core::db::init_schema()` which owns the DDL.
pub async fn init_schema(pool: &SqlitePool) -> chesstrain_core::db::Result<()> {
    chesstrain_core::db::init_schema(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/token", post(auth::token_handler))
        .route("/categories", get(categories::list_categories_handler))
        .route("/categories/{id}", get(categories::get_category_handler))
        .route("/courses", get(courses::list_courses_handler))
        .route("/courses/{id}", get(courses::get_course_handler))
        .route("/puzzles", get(puzzles::list_puzzles_handler))
        .route("/puzzles/{id}", get(puzzles::get_puzzle_handler))
        .route("/admin/leaderboard", get(admin::leaderboard_handler));

    // Any signed-in user
    let protected = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/courses/purchase/{id}",
            post(courses::purchase_course_handler),
        )
        .route("/courses/my/purchases", get(courses::my_purchases_handler))
        .route("/puzzles/attempt", post(puzzles::attempt_handler))
        .route("/puzzles/my/attempts", get(puzzles::my_attempts_handler))
        .route("/games", post(games::create_game_handler))
        .route("/games/my", get(games::my_games_handler))
        .route("/games/stats", get(games::stats_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Admins only. Layers run outermost-last, so require_auth runs first.
    let admin_only = Router::new()
        .route("/categories", post(categories::create_category_handler))
        .route(
            "/categories/{id}",
            put(categories::update_category_handler).delete(categories::delete_category_handler),
        )
        .route("/courses", post(courses::create_course_handler))
        .route(
            "/courses/{id}",
            put(courses::update_course_handler).delete(courses::delete_course_handler),
        )
        .route("/puzzles", post(puzzles::create_puzzle_handler))
        .route(
            "/puzzles/{id}",
            put(puzzles::update_puzzle_handler).delete(puzzles::delete_puzzle_handler),
        )
        .route("/admin/users", get(admin::list_users_handler))
        .route("/admin/users/{id}", axum::routing::delete(admin::delete_user_handler))
        .route("/admin/users/{id}/admin", put(admin::set_admin_handler))
        .route("/admin/stats", get(admin::stats_handler))
        .route_layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin_only)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
