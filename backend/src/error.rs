//! Error handling for the weather dashboard server
//!
//! Every error becomes a JSON body `{"error": {"code", "message", "field"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{DashboardError, StoreError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Dashboard errors
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Stored dashboard is malformed: {0}")]
    CorruptState(#[from] serde_json::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl AppError {
    /// Status code and body for this error
    fn parts(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", msg.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::Dashboard(err) => match err {
                DashboardError::TemplateNotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    ErrorDetail::new("TEMPLATE_NOT_FOUND", err.to_string()),
                ),
                DashboardError::WidgetNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    ErrorDetail::new("WIDGET_NOT_FOUND", err.to_string()),
                ),
                DashboardError::FavoriteNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    ErrorDetail::new("FAVORITE_NOT_FOUND", err.to_string()),
                ),
                DashboardError::Store(StoreError::Serialization(_)) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetail::new("CORRUPT_STATE", "Stored dashboard could not be read"),
                ),
                DashboardError::Store(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorDetail::new("STORAGE_ERROR", "Dashboard storage is unavailable"),
                ),
            },
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::CorruptState(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CORRUPT_STATE", "Stored dashboard could not be read"),
            ),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        match field_errors.iter().next() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                AppError::Validation {
                    field: field.to_string(),
                    message,
                }
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.parts();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, detail) = AppError::NotFound("Climate zone".to_string()).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(detail.message, "Climate zone not found");
    }

    #[test]
    fn test_dashboard_errors_map_by_variant() {
        let err = AppError::from(DashboardError::WidgetNotFound("42".to_string()));
        let (status, detail) = err.parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(detail.code, "WIDGET_NOT_FOUND");

        let err = AppError::from(DashboardError::Store(StoreError::Unavailable("down".into())));
        assert_eq!(err.parts().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_error_carries_field() {
        let (status, detail) = AppError::Validation {
            field: "location".to_string(),
            message: "too long".to_string(),
        }
        .parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.field.as_deref(), Some("location"));
    }
}
