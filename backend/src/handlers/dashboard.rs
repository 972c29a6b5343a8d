//! HTTP handlers for dashboard management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{AddFavoriteInput, FavoriteLocation, SetLocationInput, TemplateRef, Widget, WidgetPatch};
use crate::services::dashboard::{AddWidgetInput, ApplyTemplateResult, DashboardView};
use crate::services::DashboardService;
use crate::AppState;

fn service(state: &AppState) -> DashboardService {
    DashboardService::new(
        state.db.clone(),
        state.catalog.clone(),
        state.config.dashboard.default_location.clone(),
    )
}

/// Response carrying the touched item and the updated dashboard
#[derive(Serialize)]
pub struct ItemResponse<T> {
    pub item: T,
    pub dashboard: DashboardView,
}

/// Get a dashboard, creating it with defaults on first access
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DashboardView>> {
    let view = service(&state).get(&id).await?;
    Ok(Json(view))
}

/// Change the dashboard's active location
pub async fn set_dashboard_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetLocationInput>,
) -> AppResult<Json<DashboardView>> {
    input.validate()?;
    let view = service(&state)
        .set_location(&id, input.location.trim().to_string())
        .await?;
    Ok(Json(view))
}

/// Replace the dashboard's widgets with a template
pub async fn apply_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TemplateRef>,
) -> AppResult<Json<ApplyTemplateResult>> {
    let result = service(&state).apply_template(&id, input).await?;
    Ok(Json(result))
}

/// Add a widget
pub async fn add_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AddWidgetInput>,
) -> AppResult<(StatusCode, Json<ItemResponse<Widget>>)> {
    let (item, dashboard) = service(&state).add_widget(&id, input.kind).await?;
    Ok((StatusCode::CREATED, Json(ItemResponse { item, dashboard })))
}

/// Update a widget
pub async fn update_widget(
    State(state): State<AppState>,
    Path((id, widget_id)): Path<(String, String)>,
    Json(patch): Json<WidgetPatch>,
) -> AppResult<Json<ItemResponse<Widget>>> {
    let (item, dashboard) = service(&state).update_widget(&id, &widget_id, patch).await?;
    Ok(Json(ItemResponse { item, dashboard }))
}

/// Remove a widget
pub async fn remove_widget(
    State(state): State<AppState>,
    Path((id, widget_id)): Path<(String, String)>,
) -> AppResult<Json<DashboardView>> {
    let view = service(&state).remove_widget(&id, &widget_id).await?;
    Ok(Json(view))
}

/// Add a favourite location; blank names are ignored
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AddFavoriteInput>,
) -> AppResult<Json<ItemResponse<Option<FavoriteLocation>>>> {
    input.validate()?;
    let (item, dashboard) = service(&state).add_favorite(&id, &input.name).await?;
    Ok(Json(ItemResponse { item, dashboard }))
}

/// Remove a favourite location
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((id, favorite_id)): Path<(String, String)>,
) -> AppResult<Json<DashboardView>> {
    let view = service(&state).remove_favorite(&id, &favorite_id).await?;
    Ok(Json(view))
}
