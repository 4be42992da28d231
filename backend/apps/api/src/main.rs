//! API Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors render through
//! `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use api::config::ServerConfig;
use api::{build_router, with_http_layers};
use auth::PgUserRepository;
use ledger::PgLedgerRepository;
use platform::clock::SystemClock;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,ledger=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        env = %config.env,
        transport = %config.auth.transport,
        token_ttl_secs = config.auth.token_ttl.num_seconds(),
        "Configuration loaded"
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let router = build_router(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgLedgerRepository::new(pool)),
        &config.auth,
        Arc::new(SystemClock),
    )?;
    let app = with_http_layers(router, &config.frontend_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
