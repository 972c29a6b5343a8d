//! Models for the weather dashboard server
//!
//! Re-exports models from the shared crate and adds request bodies validated at the
//! HTTP boundary

use serde::Deserialize;
use validator::Validate;

pub use shared::models::*;

/// Query string carrying a location name
#[derive(Debug, Deserialize, Validate)]
pub struct LocationQuery {
    #[validate(length(min = 1, max = 100, message = "Location must be 1-100 characters"))]
    pub location: String,
}

/// Optional location, falling back to the configured default
#[derive(Debug, Deserialize, Validate)]
pub struct OptionalLocationQuery {
    #[validate(length(min = 1, max = 100, message = "Location must be 1-100 characters"))]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<String>,
}

/// Body of `PUT /dashboards/:id/location`
#[derive(Debug, Deserialize, Validate)]
pub struct SetLocationInput {
    #[validate(length(min = 1, max = 100, message = "Location must be 1-100 characters"))]
    pub location: String,
}

/// Body of `POST /dashboards/:id/favorites`
#[derive(Debug, Deserialize, Validate)]
pub struct AddFavoriteInput {
    #[validate(length(max = 100, message = "Favourite name must be at most 100 characters"))]
    pub name: String,
}
