//! HTTP handlers for climate lookups

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{ClimateContext, ClimateZone, LocationClimateData, LocationQuery, Recommendations};
use crate::services::ClimateService;
use crate::AppState;

/// List climate zones
pub async fn list_climate_zones(State(state): State<AppState>) -> Json<Vec<ClimateZone>> {
    Json(ClimateService::new(state.catalog).zones())
}

/// Get a climate zone by id
pub async fn get_climate_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> AppResult<Json<ClimateZone>> {
    let zone = ClimateService::new(state.catalog).zone(&zone_id)?;
    Ok(Json(zone))
}

/// List known locations
pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationClimateData>> {
    Json(ClimateService::new(state.catalog).locations())
}

/// Resolve the climate context for a location
pub async fn lookup_climate(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<ClimateContext>> {
    query.validate()?;
    let context = ClimateService::new(state.catalog).lookup(&query.location, Utc::now());
    Ok(Json(context))
}

/// Seasonal recommendations for a location; `null` when the season is unknown
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Option<Recommendations>>> {
    query.validate()?;
    let recs = ClimateService::new(state.catalog).recommendations(&query.location, Utc::now());
    Ok(Json(recs))
}
