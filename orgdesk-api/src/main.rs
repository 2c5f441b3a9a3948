//! # OrgDesk API Server
//!
//! REST API for company, department, and employee record keeping with
//! onboarding tracking and JWT-authenticated user accounts.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p orgdesk-api
//! ```

use orgdesk_api::{app, config::Config};
use orgdesk_shared::db::{migrations, pool};
use orgdesk_shared::models::revoked_token::RevokedToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orgdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "OrgDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    migrations::ensure_database_exists(&config.database.url).await?;

    let db_config = pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let db = pool::create_pool(db_config).await?;

    migrations::run_migrations(&db).await?;

    let pruned = RevokedToken::prune_expired(&db).await?;
    if pruned > 0 {
        tracing::info!(pruned, "Pruned expired revoked tokens");
    }

    let state = app::AppState::new(db.clone(), config.clone());
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
