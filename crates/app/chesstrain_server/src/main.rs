//! Chess training API server binary.
//!
//! Opens (and if needed creates) the SQLite database, then serves the HTTP
//! API until interrupted.

use chesstrain_api::{AppState, config::ApiConfig};
use chesstrain_core::db::{self, DEFAULT_DATABASE_URL};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,chesstrain_api=debug,chesstrain_core=debug";

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "chesstrain_server", about = "Chess training API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// SQLite database file or URL.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, port = args.port, "starting chesstrain_server");
    info!(max_connections = args.max_connections, "configuring connection pool");

    let config = ApiConfig::new(&args.host, args.port, args.database_url);

    let pool = db::connect(&config.database_url, args.max_connections).await?;
    chesstrain_api::init_schema(&pool).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = chesstrain_api::router(AppState::new(pool.clone(), config));

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    wait_for_interrupt(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. If the handler cannot be installed the
/// server keeps running instead of shutting down straight away.
async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(e) => {
            error!(error = %e, "failed to listen for interrupt, graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}
