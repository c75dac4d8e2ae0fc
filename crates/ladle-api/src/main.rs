//! Ladle API Server
//!
//! REST API server for the ladle recipes service.

use anyhow::Context;
use ladle_api::repository::{PgRecipeStore, PgUserStore};
use ladle_api::{create_router, state::AppState};
use ladle_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ladle_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Connect to the database and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database.pool_size)
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    // Create application state
    let state = Arc::new(AppState::new(
        config,
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgRecipeStore::new(pool)),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("ladle API server starting on http://{addr}");
    tracing::info!("Swagger UI available at http://{addr}/swagger-ui/");

    axum::serve(listener, app).await?;

    Ok(())
}
