// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use commerce_core::domains::auth::JwtService;
use commerce_core::kernel::{LlmAdapter, ServerDeps};
use commerce_core::server::{build_app, AppOptions};
use commerce_core::Config;
use llm_client::LlmClient;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,commerce_core=debug,llm_client=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting skincare commerce API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        llm_provider = %config.llm.provider,
        llm_model = %config.llm.model,
        "Configuration loaded"
    );

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let llm = Arc::new(LlmAdapter::new(Arc::new(LlmClient::new(config.llm.clone()))));
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let server_deps = Arc::new(ServerDeps::new(pool, llm, jwt_service));

    let app = build_app(
        server_deps,
        AppOptions {
            allowed_origins: config.allowed_origins.clone(),
            rate_limit: true,
        },
    );

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("GraphQL endpoint: http://localhost:{}/graphql", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
