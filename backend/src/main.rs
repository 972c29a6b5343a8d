//! Weather Dashboard - Backend Server
//!
//! Serves the climate catalogue, template catalogues and persisted widget dashboards
//! built on the shared composition engine.

use axum::{routing::get, Router};
use shared::Catalog;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

/// Log filter used when `RUST_LOG` is unset; `shared` carries the dashboard events
const DEFAULT_LOG_FILTER: &str = "wdash_server=debug,shared=debug,tower_http=debug,sqlx=warn";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Weather Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    // Load catalogue
    let catalog = load_catalog(&config)?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        catalog: Arc::new(catalog),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|_| error::AppError::Configuration(format!("invalid host {}", config.server.host)))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse the catalogue, applying overrides and reporting inconsistencies
fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let sources = config.catalog.sources()?;
    let catalog = Catalog::from_sources(&sources)?;

    let issues = catalog.validate();
    for issue in &issues {
        tracing::warn!("Catalogue issue: {}", issue);
    }
    tracing::info!(
        zones = catalog.zones().len(),
        locations = catalog.locations().len(),
        issues = issues.len(),
        "Catalogue loaded"
    );

    Ok(catalog)
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Weather Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
