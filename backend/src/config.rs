//! Configuration management for the weather dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WDASH_ prefix

use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::CatalogSources;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Catalogue overrides
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Dashboard defaults
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Directory holding JSON documents that replace the embedded catalogue
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Location used for dashboards that have not picked one
    pub default_location: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WDASH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("dashboard.default_location", shared::DEFAULT_LOCATION)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WDASH_ prefix)
            .add_source(
                Environment::with_prefix("WDASH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl CatalogConfig {
    /// Read whichever override documents exist in the configured directory
    pub fn sources(&self) -> std::io::Result<CatalogSources> {
        let Some(dir) = &self.directory else {
            return Ok(CatalogSources::default());
        };

        Ok(CatalogSources {
            climate_zones: read_optional(dir, "climate_zones.json")?,
            locations: read_optional(dir, "locations.json")?,
            layout_templates: read_optional(dir, "layout_templates.json")?,
            seasonal_templates: read_optional(dir, "seasonal_templates.json")?,
            adaptive_templates: read_optional(dir, "adaptive_templates.json")?,
        })
    }
}

fn read_optional(dir: &Path, name: &str) -> std::io::Result<Option<String>> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(None);
    }
    tracing::info!("Using catalogue override {}", path.display());
    std::fs::read_to_string(path).map(Some)
}
