//! Health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::dashboard::last_update;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub climate_zones: usize,
    pub templates: usize,
    pub last_dashboard_update: Option<DateTime<Utc>>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let (db_status, last_dashboard_update) = match last_update(&state.db).await {
        Ok(latest) => ("connected".to_string(), latest),
        Err(_) => ("disconnected".to_string(), None),
    };

    let catalog = &state.catalog;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        climate_zones: catalog.zones().len(),
        templates: catalog.layouts().len()
            + catalog.seasonal_templates().len()
            + catalog.adaptive_templates().len(),
        last_dashboard_update,
    })
}
