//! Validation utilities for the weather dashboard

use rust_decimal::Decimal;

use crate::models::WidgetPatch;
use crate::types::Coordinates;

// ============================================================================
// Location Validations
// ============================================================================

/// Maximum length of a location name
pub const MAX_LOCATION_LENGTH: usize = 100;

/// Validate a location name entered by the user
pub fn validate_location_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Location name cannot be empty");
    }
    if trimmed.chars().count() > MAX_LOCATION_LENGTH {
        return Err("Location name must be at most 100 characters");
    }
    if trimmed.chars().any(char::is_control) {
        return Err("Location name cannot contain control characters");
    }
    Ok(())
}

/// Validate coordinates are on the globe
pub fn validate_coordinates(coordinates: &Coordinates) -> Result<(), &'static str> {
    if coordinates.lat < Decimal::from(-90) || coordinates.lat > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coordinates.lon < Decimal::from(-180) || coordinates.lon > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// Season Validations
// ============================================================================

/// Validate a calendar month (1-12)
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

// ============================================================================
// Widget Validations
// ============================================================================

/// Shortest allowed refresh interval in seconds
pub const MIN_REFRESH_INTERVAL: u32 = 60;

/// Longest allowed refresh interval in seconds (one day)
pub const MAX_REFRESH_INTERVAL: u32 = 86_400;

/// Validate a widget refresh interval in seconds
pub fn validate_refresh_interval(seconds: u32) -> Result<(), &'static str> {
    if seconds < MIN_REFRESH_INTERVAL {
        return Err("Refresh interval must be at least 60 seconds");
    }
    if seconds > MAX_REFRESH_INTERVAL {
        return Err("Refresh interval must be at most one day");
    }
    Ok(())
}

/// Validate a widget title
pub fn validate_widget_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Widget title cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Widget title must be at most 100 characters");
    }
    Ok(())
}

/// Validate the fields present in a widget patch
pub fn validate_widget_patch(patch: &WidgetPatch) -> Result<(), &'static str> {
    if let Some(title) = &patch.title {
        validate_widget_title(title)?;
    }
    if let Some(location) = &patch.location {
        validate_location_name(location)?;
    }
    if let Some(position) = &patch.position {
        if position.x < 0 || position.y < 0 {
            return Err("Widget position cannot be negative");
        }
    }
    if let Some(interval) = patch.settings.as_ref().and_then(|s| s.refresh_interval) {
        validate_refresh_interval(interval)?;
    }
    Ok(())
}
