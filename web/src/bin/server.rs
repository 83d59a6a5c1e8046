//! Stayplan Server
//!
//! Main server process for the hotel-and-event booking API.
//!
//! This binary:
//! - Connects to `PostgreSQL` and ensures the schema
//! - Wires the booking engine and itinerary planner
//! - Configures the identity provider and the Gemini planning oracle
//! - Serves the HTTP API until interrupted
//!
//! # Usage
//!
//! ```bash
//! # Start infrastructure
//! docker compose up -d postgres
//!
//! # Run server
//! DATABASE_URL=postgres://localhost/stayplan cargo run --bin server
//! ```

use stayplan_core::environment::SystemClock;
use stayplan_gemini::GeminiClient;
use stayplan_postgres::{connect, ensure_schema, PostgresEventRepository, PostgresRoomRepository};
use stayplan_web::auth::IdentityProvider;
use stayplan_web::{build_router, AppState, Config, RemoteIdentityProvider, StaticTokenIdentity};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stayplan=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stayplan server...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        database = %config.database.url,
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    // Database
    let pool = connect(&config.database.url, config.database.max_connections).await?;
    ensure_schema(&pool).await?;
    tracing::info!("Database ready");

    let events = Arc::new(PostgresEventRepository::new(pool.clone()));
    let rooms = Arc::new(PostgresRoomRepository::new(pool));

    // Planning oracle
    if config.gemini.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; itinerary generation will fail");
    }
    let mut oracle = GeminiClient::new(config.gemini.api_key.clone())
        .with_model(config.gemini.model.clone());
    if let Some(api_url) = &config.gemini.api_url {
        oracle = oracle.with_api_url(api_url.clone());
    }

    // Identity provider
    let identity: Arc<dyn IdentityProvider> = match &config.auth.verify_url {
        Some(verify_url) => {
            tracing::info!(verify_url = %verify_url, "Using remote identity provider");
            Arc::new(RemoteIdentityProvider::new(verify_url.clone()))
        }
        None => {
            if config.auth.static_tokens.is_empty() {
                tracing::warn!(
                    "No AUTH_VERIFY_URL or AUTH_STATIC_TOKENS configured; \
                     protected endpoints will reject every request"
                );
            }
            Arc::new(StaticTokenIdentity::from_spec(&config.auth.static_tokens))
        }
    };

    // Application state and router
    let state = AppState::new(
        events,
        rooms,
        Arc::new(oracle),
        identity,
        Arc::new(SystemClock),
    );
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Stayplan server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
    }
}
