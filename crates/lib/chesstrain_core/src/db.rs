//! SQLite database setup.
//!
//! Provides connection-pool construction from a `DATABASE_URL`-style string
//! and the idempotent schema bootstrap run at startup.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, info};

/// Default database file when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "chess_service.db";

/// Prefix of the legacy SQLAlchemy-style URL, stripped to a relative path.
const LEGACY_URL_PREFIX: &str = "sqlite+aiosqlite:///./";

/// Maximum time to wait for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during database setup.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Result type for database setup.
pub type Result<T> = std::result::Result<T, DbError>;

/// Tables created by [`init_schema`], in creation order.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        email TEXT UNIQUE NOT NULL,
        hashed_password TEXT NOT NULL,
        is_admin BOOLEAN DEFAULT 0,
        rating INTEGER DEFAULT 1200,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        price REAL DEFAULT 0.0,
        category_id INTEGER,
        difficulty TEXT DEFAULT 'beginner',
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (category_id) REFERENCES categories(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS puzzles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        fen TEXT NOT NULL,
        solution TEXT NOT NULL,
        difficulty TEXT DEFAULT 'easy',
        category_id INTEGER,
        rating INTEGER DEFAULT 1200,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (category_id) REFERENCES categories(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        game_type TEXT NOT NULL,
        result TEXT,
        moves TEXT,
        duration INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS puzzle_attempts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        puzzle_id INTEGER NOT NULL,
        success BOOLEAN,
        time_taken INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (puzzle_id) REFERENCES puzzles(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS purchases (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        course_id INTEGER NOT NULL,
        amount REAL NOT NULL,
        purchased_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (course_id) REFERENCES courses(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rating_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        rating INTEGER NOT NULL,
        change INTEGER DEFAULT 0,
        reason TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
];

/// Build connection options from a `DATABASE_URL`-style string.
///
/// Accepts a bare file path, a `sqlite:` URL, `:memory:`, or the legacy
/// `sqlite+aiosqlite:///./<file>` form. Foreign keys are declared in the
/// schema but left unenforced, matching SQLite's default.
pub fn connect_options(url: &str) -> Result<SqliteConnectOptions> {
    let url = url.trim();
    let options = if let Some(path) = url.strip_prefix(LEGACY_URL_PREFIX) {
        SqliteConnectOptions::new().filename(path)
    } else if url == ":memory:" {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else if url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(url)?
    } else if url.is_empty() {
        return Err(DbError::InvalidUrl("empty database URL".into()));
    } else {
        SqliteConnectOptions::new().filename(url)
    };
    Ok(options.create_if_missing(true).foreign_keys(false))
}

/// Open a connection pool for `url`.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = connect_options(url)?;
    debug!(filename = %options.get_filename().display(), "opening SQLite pool");
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
///
/// The connection is never recycled, since closing it would drop the data.
pub async fn memory_pool() -> Result<SqlitePool> {
    let options = connect_options(":memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables if they do not exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = SCHEMA.len(), "database schema ready");
    Ok(())
}

/// Whether the database answers a trivial query.
pub async fn is_connected(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
