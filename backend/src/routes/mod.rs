//! Route definitions for the weather dashboard API

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Climate catalogue and lookups
        .nest("/climate", climate_routes())
        // Template catalogues
        .nest("/templates", template_routes())
        // Persisted dashboards
        .nest("/dashboards", dashboard_routes())
}

/// Climate routes
fn climate_routes() -> Router<AppState> {
    Router::new()
        .route("/zones", get(handlers::list_climate_zones))
        .route("/zones/:zone_id", get(handlers::get_climate_zone))
        .route("/locations", get(handlers::list_locations))
        .route("/lookup", get(handlers::lookup_climate))
        .route("/recommendations", get(handlers::get_recommendations))
}

/// Template routes
fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/layouts", get(handlers::list_layout_templates))
        .route("/seasonal", get(handlers::list_seasonal_templates))
        .route("/seasonal/active", get(handlers::list_active_seasonal_templates))
        .route("/adaptive", get(handlers::list_adaptive_templates))
        .route(
            "/adaptive/:template_id/preview",
            get(handlers::preview_adaptive_template),
        )
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(handlers::get_dashboard))
        .route("/:id/location", put(handlers::set_dashboard_location))
        .route("/:id/apply", post(handlers::apply_template))
        .route("/:id/widgets", post(handlers::add_widget))
        .route(
            "/:id/widgets/:widget_id",
            patch(handlers::update_widget).delete(handlers::remove_widget),
        )
        .route("/:id/favorites", post(handlers::add_favorite))
        .route(
            "/:id/favorites/:favorite_id",
            delete(handlers::remove_favorite),
        )
}
