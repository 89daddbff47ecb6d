use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use team_roles_api::{app, config::Settings, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("Failed to load configuration")?;

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(profile = ?settings.profile, "Starting api server...");

    let pool = db::connect(&settings.database_url)
        .await
        .context("Failed to connect to database")?;
    db::init_schema(&pool)
        .await
        .context("Failed to create database schema")?;

    tracing::info!("Database connection established.");

    let addr = settings.bind_address();
    let state = app::AppState::new(pool, settings).context("Invalid API description")?;
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server.")?;

    Ok(())
}
