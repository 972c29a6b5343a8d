//! Dashboard service
//!
//! Each request loads the dashboard row, runs the shared controller over an in-memory
//! copy of it and writes the resulting state back inside the same transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};

use shared::{
    Catalog, ClimateContext, Dashboard, DashboardError, DashboardSnapshot, FavoriteLocation,
    MemoryStore, Recommendations, SystemClock, TemplateRef, Widget, WidgetKind, WidgetPatch,
};

use crate::error::{AppError, AppResult};

/// Insert a bare row for a new id; existing rows are left alone
const CLAIM_ROW_SQL: &str = r#"
    INSERT INTO dashboards (id, location)
    VALUES ($1, $2)
    ON CONFLICT (id) DO NOTHING
"#;

const LOCK_ROW_SQL: &str = r#"
    SELECT location, widgets, favorites
    FROM dashboards
    WHERE id = $1
    FOR UPDATE
"#;

/// Stored dashboard row
#[derive(Debug, Clone, FromRow)]
struct DashboardRow {
    location: String,
    widgets: Option<serde_json::Value>,
    favorites: Option<serde_json::Value>,
}

impl DashboardRow {
    /// Active location and a store holding whatever state was saved; a freshly
    /// claimed row has none, so the controller seeds defaults
    fn into_store(self) -> AppResult<(String, MemoryStore)> {
        let store = MemoryStore::with_state(decode(self.widgets)?, decode(self.favorites)?);
        Ok((self.location, store))
    }
}

/// Dashboard state returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub id: String,
    pub location: String,
    pub widgets: Vec<Widget>,
    pub favorites: Vec<FavoriteLocation>,
    pub climate: Option<ClimateContext>,
    pub recommendations: Option<Recommendations>,
}

/// Result of applying a template
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateResult {
    /// False when an adaptive template could not resolve a climate zone
    pub applied: bool,
    pub dashboard: DashboardView,
}

/// Input for adding a widget
#[derive(Debug, Deserialize)]
pub struct AddWidgetInput {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
}

type Controller = Dashboard<MemoryStore, SystemClock>;

#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
    catalog: Arc<Catalog>,
    default_location: String,
}

/// Dashboard ids are client-chosen slugs
pub fn validate_dashboard_id(id: &str) -> AppResult<()> {
    let valid = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation {
            field: "id".to_string(),
            message: "Dashboard id must be 1-64 letters, digits, '-' or '_'".to_string(),
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Option<serde_json::Value>) -> AppResult<Option<T>> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(AppError::from)
}

impl DashboardService {
    pub fn new(db: PgPool, catalog: Arc<Catalog>, default_location: String) -> Self {
        Self {
            db,
            catalog,
            default_location,
        }
    }

    /// Load the dashboard, run `op` against it and persist the outcome
    async fn with_dashboard<T>(
        &self,
        id: &str,
        op: impl FnOnce(&mut Controller) -> Result<T, DashboardError>,
    ) -> AppResult<(T, DashboardView)> {
        validate_dashboard_id(id)?;

        let mut tx = self.db.begin().await?;

        // Claim the row first so concurrent first requests serialise on its lock
        let claimed = sqlx::query(CLAIM_ROW_SQL)
            .bind(id)
            .bind(&self.default_location)
            .execute(&mut *tx)
            .await?;
        if claimed.rows_affected() > 0 {
            tracing::info!(dashboard_id = %id, "Creating dashboard");
        }

        let row = sqlx::query_as::<_, DashboardRow>(LOCK_ROW_SQL)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let (location, store) = row.into_store()?;

        let mut dashboard = Dashboard::open(self.catalog.clone(), store, SystemClock, location.clone())?;
        dashboard.resolve_location(location);
        let outcome = op(&mut dashboard)?;

        let snapshot = dashboard.snapshot();
        self.save(&mut tx, id, &snapshot).await?;
        tx.commit().await?;

        let view = DashboardView {
            id: id.to_string(),
            location: snapshot.location,
            widgets: snapshot.widgets,
            favorites: snapshot.favorites,
            climate: dashboard.climate().cloned(),
            recommendations: dashboard.recommendations(),
        };
        Ok((outcome, view))
    }

    async fn save(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &str,
        snapshot: &DashboardSnapshot,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dashboards (id, location, widgets, favorites)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET location = EXCLUDED.location,
                widgets = EXCLUDED.widgets,
                favorites = EXCLUDED.favorites,
                updated_at = NOW()
            "#,
        )
        .bind(id)
        .bind(&snapshot.location)
        .bind(Json(&snapshot.widgets))
        .bind(Json(&snapshot.favorites))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Current dashboard state, seeding defaults on first access
    pub async fn get(&self, id: &str) -> AppResult<DashboardView> {
        let ((), view) = self.with_dashboard(id, |_| Ok(())).await?;
        Ok(view)
    }

    /// Switch the active location and re-resolve its climate
    pub async fn set_location(&self, id: &str, location: String) -> AppResult<DashboardView> {
        shared::validate_location_name(&location).map_err(|message| AppError::Validation {
            field: "location".to_string(),
            message: message.to_string(),
        })?;
        let ((), view) = self
            .with_dashboard(id, |dashboard| {
                dashboard.resolve_location(location);
                Ok(())
            })
            .await?;
        Ok(view)
    }

    pub async fn apply_template(&self, id: &str, template: TemplateRef) -> AppResult<ApplyTemplateResult> {
        let (applied, dashboard) = self
            .with_dashboard(id, |dashboard| dashboard.apply_template(&template))
            .await?;
        Ok(ApplyTemplateResult { applied, dashboard })
    }

    pub async fn add_widget(&self, id: &str, kind: WidgetKind) -> AppResult<(Widget, DashboardView)> {
        self.with_dashboard(id, |dashboard| dashboard.add_widget(kind).cloned())
            .await
    }

    pub async fn update_widget(
        &self,
        id: &str,
        widget_id: &str,
        patch: WidgetPatch,
    ) -> AppResult<(Widget, DashboardView)> {
        shared::validate_widget_patch(&patch).map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        self.with_dashboard(id, |dashboard| dashboard.update_widget(widget_id, &patch).cloned())
            .await
    }

    pub async fn remove_widget(&self, id: &str, widget_id: &str) -> AppResult<DashboardView> {
        let ((), view) = self
            .with_dashboard(id, |dashboard| dashboard.remove_widget(widget_id))
            .await?;
        Ok(view)
    }

    /// Add a favourite; `None` when the name was blank
    pub async fn add_favorite(
        &self,
        id: &str,
        name: &str,
    ) -> AppResult<(Option<FavoriteLocation>, DashboardView)> {
        self.with_dashboard(id, |dashboard| {
            dashboard.add_favorite(name).map(|added| added.cloned())
        })
        .await
    }

    pub async fn remove_favorite(&self, id: &str, favorite_id: &str) -> AppResult<DashboardView> {
        let ((), view) = self
            .with_dashboard(id, |dashboard| dashboard.remove_favorite(favorite_id))
            .await?;
        Ok(view)
    }
}

/// Timestamp of the last write, used by the health endpoint
pub async fn last_update(db: &PgPool) -> AppResult<Option<DateTime<Utc>>> {
    let latest = sqlx::query_scalar::<_, Option<DateTime<Utc>>>("SELECT MAX(updated_at) FROM dashboards")
        .fetch_one(db)
        .await?;
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_id_validation() {
        assert!(validate_dashboard_id("home").is_ok());
        assert!(validate_dashboard_id("user_42-main").is_ok());
        assert!(validate_dashboard_id("").is_err());
        assert!(validate_dashboard_id("../etc").is_err());
        assert!(validate_dashboard_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_decode_missing_value_is_none() {
        let widgets: Option<Vec<Widget>> = decode(None).unwrap();
        assert!(widgets.is_none());

        let stored = serde_json::json!([{
            "id": "1",
            "type": "forecast",
            "title": "Forecast",
            "location": "Rome",
            "size": "large",
            "position": {"x": 0, "y": 0}
        }]);
        let widgets: Option<Vec<Widget>> = decode(Some(stored)).unwrap();
        assert_eq!(widgets.unwrap()[0].location, "Rome");
    }

    #[test]
    fn test_row_is_claimed_before_locking() {
        let claim = CLAIM_ROW_SQL.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(claim.starts_with("INSERT INTO dashboards (id, location)"));
        assert!(claim.ends_with("ON CONFLICT (id) DO NOTHING"));
        assert!(LOCK_ROW_SQL.contains("FOR UPDATE"));
    }

    #[test]
    fn test_claimed_row_seeds_defaults() {
        let row = DashboardRow {
            location: "Lima".to_string(),
            widgets: None,
            favorites: None,
        };
        let (location, store) = row.into_store().unwrap();
        assert_eq!(location, "Lima");

        let catalog = Arc::new(Catalog::builtin().unwrap());
        let dashboard = Dashboard::open(catalog, store, SystemClock, location).unwrap();
        assert_eq!(dashboard.widgets(), shared::default_widgets().as_slice());
        assert_eq!(dashboard.store().widgets().map(|w| w.len()), Some(3));
    }

    #[test]
    fn test_add_widget_input_accepts_unknown_type() {
        let input: AddWidgetInput = serde_json::from_str(r#"{"type": "volcano-ash"}"#).unwrap();
        assert!(!input.kind.is_known());
    }
}
