//! HTTP handlers for the template catalogues

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{
    AdaptiveSeasonalTemplate, CategoryQuery, OptionalLocationQuery, SeasonQuery, SeasonalTemplate,
    WidgetTemplate,
};
use crate::services::TemplateService;
use crate::AppState;
use shared::AdaptationPreview;

/// List layout templates, optionally by category
pub async fn list_layout_templates(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<WidgetTemplate>>> {
    let templates = TemplateService::new(state.catalog).layouts(query.category.as_deref())?;
    Ok(Json(templates))
}

/// List seasonal templates, optionally by season (`current` for today's season)
pub async fn list_seasonal_templates(
    State(state): State<AppState>,
    Query(query): Query<SeasonQuery>,
) -> AppResult<Json<Vec<SeasonalTemplate>>> {
    let templates =
        TemplateService::new(state.catalog).seasonal(query.season.as_deref(), Utc::now())?;
    Ok(Json(templates))
}

/// Seasonal templates auto-activated today at a location
pub async fn list_active_seasonal_templates(
    State(state): State<AppState>,
    Query(query): Query<OptionalLocationQuery>,
) -> AppResult<Json<Vec<SeasonalTemplate>>> {
    query.validate()?;
    let location = query
        .location
        .unwrap_or_else(|| state.config.dashboard.default_location.clone());
    let templates = TemplateService::new(state.catalog).active_seasonal(&location, Utc::now());
    Ok(Json(templates))
}

/// List adaptive templates, optionally only those covering a location's zone
pub async fn list_adaptive_templates(
    State(state): State<AppState>,
    Query(query): Query<OptionalLocationQuery>,
) -> AppResult<Json<Vec<AdaptiveSeasonalTemplate>>> {
    query.validate()?;
    let templates = TemplateService::new(state.catalog).adaptive(query.location.as_deref());
    Ok(Json(templates))
}

/// Preview an adaptive template for a location's climate zone
pub async fn preview_adaptive_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Query(query): Query<OptionalLocationQuery>,
) -> AppResult<Json<AdaptationPreview>> {
    query.validate()?;
    let location = query
        .location
        .unwrap_or_else(|| state.config.dashboard.default_location.clone());
    let preview = TemplateService::new(state.catalog).preview(&template_id, &location)?;
    Ok(Json(preview))
}
