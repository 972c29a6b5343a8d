//! Dashboard controller
//!
//! Owns the widget list, favourites, the active location and its climate context.
//! Persistence goes through the [`DashboardStore`] port and time through [`Clock`], so
//! the same controller runs against browser storage, a database row or memory.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::composition::apply_template;
use crate::models::{
    ClimateContext, FavoriteLocation, Recommendations, TemplateKind, TemplateRef, Widget,
    WidgetKind, WidgetPatch, WidgetSettings,
};
use crate::recommendation::recommend;
use crate::types::{GridPosition, Theme, Units, WidgetSize};

/// Location shown before the user picks one
pub const DEFAULT_LOCATION: &str = "New York";

/// Persistence port errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Stored data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Dashboard controller errors
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No {kind} template with id '{id}'")]
    TemplateNotFound { kind: TemplateKind, id: String },

    #[error("No widget with id '{0}'")]
    WidgetNotFound(String),

    #[error("No favourite with id '{0}'")]
    FavoriteNotFound(String),
}

/// Load/save port for dashboard state
///
/// `Ok(None)` from a load means nothing has been stored yet.
pub trait DashboardStore {
    fn load_widgets(&self) -> Result<Option<Vec<Widget>>, StoreError>;
    fn save_widgets(&mut self, widgets: &[Widget]) -> Result<(), StoreError>;
    fn load_favorites(&self) -> Result<Option<Vec<FavoriteLocation>>, StoreError>;
    fn save_favorites(&mut self, favorites: &[FavoriteLocation]) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    widgets: Option<Vec<Widget>>,
    favorites: Option<Vec<FavoriteLocation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(widgets: Option<Vec<Widget>>, favorites: Option<Vec<FavoriteLocation>>) -> Self {
        Self { widgets, favorites }
    }

    pub fn widgets(&self) -> Option<&[Widget]> {
        self.widgets.as_deref()
    }

    pub fn favorites(&self) -> Option<&[FavoriteLocation]> {
        self.favorites.as_deref()
    }
}

impl DashboardStore for MemoryStore {
    fn load_widgets(&self) -> Result<Option<Vec<Widget>>, StoreError> {
        Ok(self.widgets.clone())
    }

    fn save_widgets(&mut self, widgets: &[Widget]) -> Result<(), StoreError> {
        self.widgets = Some(widgets.to_vec());
        Ok(())
    }

    fn load_favorites(&self) -> Result<Option<Vec<FavoriteLocation>>, StoreError> {
        Ok(self.favorites.clone())
    }

    fn save_favorites(&mut self, favorites: &[FavoriteLocation]) -> Result<(), StoreError> {
        self.favorites = Some(favorites.to_vec());
        Ok(())
    }
}

/// Widgets seeded into an empty dashboard
pub fn default_widgets() -> Vec<Widget> {
    let widget = |id: &str,
                  kind: WidgetKind,
                  title: &str,
                  size: WidgetSize,
                  x: i32,
                  y: i32,
                  settings: WidgetSettings| Widget {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        location: DEFAULT_LOCATION.to_string(),
        size,
        position: GridPosition::new(x, y),
        settings,
    };

    vec![
        widget(
            "1",
            WidgetKind::CurrentWeather,
            "Current Weather",
            WidgetSize::Medium,
            0,
            0,
            WidgetSettings::standard(),
        ),
        widget(
            "2",
            WidgetKind::Forecast,
            "5-Day Forecast",
            WidgetSize::Large,
            1,
            0,
            WidgetSettings {
                show_details: Some(false),
                refresh_interval: Some(600),
                ..WidgetSettings::standard()
            },
        ),
        widget(
            "3",
            WidgetKind::TemperatureChart,
            "Temperature Trend",
            WidgetSize::Medium,
            0,
            1,
            WidgetSettings {
                theme: Some(Theme::Auto),
                refresh_interval: Some(300),
                units: Some(Units::Metric),
                show_background: Some(true),
                ..Default::default()
            },
        ),
    ]
}

/// Favourites seeded into an empty dashboard
pub fn default_favorites(now: chrono::DateTime<chrono::Utc>) -> Vec<FavoriteLocation> {
    ["New York", "London", "Tokyo"]
        .iter()
        .enumerate()
        .map(|(index, name)| FavoriteLocation {
            id: (index + 1).to_string(),
            name: name.to_string(),
            added_at: now,
        })
        .collect()
}

/// Serializable view of a dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub location: String,
    pub widgets: Vec<Widget>,
    pub favorites: Vec<FavoriteLocation>,
}

/// Pending location resolution
///
/// Only the ticket from the most recent [`Dashboard::begin_resolution`] can complete;
/// older tickets are discarded so a slow lookup never overwrites a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    location: String,
}

impl ResolutionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

pub struct Dashboard<S, C> {
    catalog: Arc<Catalog>,
    store: S,
    clock: C,
    widgets: Vec<Widget>,
    favorites: Vec<FavoriteLocation>,
    location: String,
    climate: Option<ClimateContext>,
    generation: u64,
}

impl<S: DashboardStore, C: Clock> Dashboard<S, C> {
    /// Load state from `store`, seeding and saving defaults for anything missing
    ///
    /// The climate context starts unresolved.
    pub fn open(
        catalog: Arc<Catalog>,
        mut store: S,
        clock: C,
        location: impl Into<String>,
    ) -> Result<Self, DashboardError> {
        let widgets = match store.load_widgets()? {
            Some(widgets) => widgets,
            None => {
                let widgets = default_widgets();
                store.save_widgets(&widgets)?;
                tracing::debug!("Seeded default widgets");
                widgets
            }
        };

        let favorites = match store.load_favorites()? {
            Some(favorites) => favorites,
            None => {
                let favorites = default_favorites(clock.now());
                store.save_favorites(&favorites)?;
                favorites
            }
        };

        Ok(Self {
            catalog,
            store,
            clock,
            widgets,
            favorites,
            location: location.into(),
            climate: None,
            generation: 0,
        })
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn favorites(&self) -> &[FavoriteLocation] {
        &self.favorites
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Resolved climate context; `None` while loading
    pub fn climate(&self) -> Option<&ClimateContext> {
        self.climate.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.climate.as_ref().map_or(true, |context| context.is_loading)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            location: self.location.clone(),
            widgets: self.widgets.clone(),
            favorites: self.favorites.clone(),
        }
    }

    /// Recommendations for the resolved zone and season
    pub fn recommendations(&self) -> Option<Recommendations> {
        let context = self.climate.as_ref()?;
        let zone = context.climate_zone.as_ref()?;
        let season = context.current_season.as_deref()?;
        recommend(zone, season, &context.climate_data)
    }

    fn save_widgets(&mut self) -> Result<(), DashboardError> {
        self.store.save_widgets(&self.widgets)?;
        Ok(())
    }

    fn save_favorites(&mut self) -> Result<(), DashboardError> {
        self.store.save_favorites(&self.favorites)?;
        Ok(())
    }

    /// Millisecond id, suffixed when another entry already took it
    fn fresh_id(&self, taken: impl Fn(&str) -> bool) -> String {
        let base = self.clock.now().timestamp_millis().to_string();
        if !taken(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }

    /// Append a widget of `kind` at the bottom of the grid
    pub fn add_widget(&mut self, kind: WidgetKind) -> Result<&Widget, DashboardError> {
        let id = self.fresh_id(|id| self.widgets.iter().any(|w| w.id == id));
        let widget = Widget {
            id,
            title: kind.default_title(),
            kind,
            location: self.location.clone(),
            size: WidgetSize::Medium,
            position: GridPosition::new(0, self.widgets.len() as i32),
            settings: WidgetSettings::standard(),
        };
        tracing::info!(widget_id = %widget.id, kind = %widget.kind, "Widget added");

        self.widgets.push(widget);
        self.save_widgets()?;
        let index = self.widgets.len() - 1;
        Ok(&self.widgets[index])
    }

    pub fn remove_widget(&mut self, id: &str) -> Result<(), DashboardError> {
        let before = self.widgets.len();
        self.widgets.retain(|widget| widget.id != id);
        if self.widgets.len() == before {
            return Err(DashboardError::WidgetNotFound(id.to_string()));
        }
        tracing::info!(widget_id = %id, "Widget removed");
        self.save_widgets()
    }

    pub fn update_widget(&mut self, id: &str, patch: &WidgetPatch) -> Result<&Widget, DashboardError> {
        let index = self
            .widgets
            .iter()
            .position(|widget| widget.id == id)
            .ok_or_else(|| DashboardError::WidgetNotFound(id.to_string()))?;
        self.widgets[index] = self.widgets[index].apply_patch(patch);
        self.save_widgets()?;
        Ok(&self.widgets[index])
    }

    /// Replace the widget set with the referenced template
    ///
    /// Returns `Ok(false)` without touching anything when an adaptive template is
    /// applied while the climate context is still loading.
    pub fn apply_template(&mut self, template: &TemplateRef) -> Result<bool, DashboardError> {
        let now = self.clock.now();
        let climate = self.climate.as_ref();
        let not_found = || DashboardError::TemplateNotFound {
            kind: template.kind,
            id: template.template_id.clone(),
        };

        let composed = match template.kind {
            TemplateKind::Layout => {
                let found = self.catalog.layout(&template.template_id).ok_or_else(not_found)?;
                apply_template(found, climate, &self.location, now)
            }
            TemplateKind::Seasonal => {
                let found = self.catalog.seasonal(&template.template_id).ok_or_else(not_found)?;
                apply_template(found, climate, &self.location, now)
            }
            TemplateKind::Adaptive => {
                let found = self.catalog.adaptive(&template.template_id).ok_or_else(not_found)?;
                apply_template(found, climate, &self.location, now)
            }
        };

        match composed {
            Some(widgets) => {
                tracing::info!(
                    kind = %template.kind,
                    template_id = %template.template_id,
                    widgets = widgets.len(),
                    "Template applied"
                );
                self.widgets = widgets;
                self.save_widgets()?;
                Ok(true)
            }
            None => {
                tracing::debug!(
                    template_id = %template.template_id,
                    "Climate context unresolved, template not applied"
                );
                Ok(false)
            }
        }
    }

    /// Switch to `location` and mark the climate context as loading
    pub fn begin_resolution(&mut self, location: impl Into<String>) -> ResolutionTicket {
        self.generation += 1;
        self.location = location.into();
        self.climate = None;
        ResolutionTicket {
            generation: self.generation,
            location: self.location.clone(),
        }
    }

    /// Install `context` if `ticket` is still current; stale tickets are dropped
    pub fn complete_resolution(&mut self, ticket: ResolutionTicket, context: ClimateContext) -> bool {
        if ticket.generation != self.generation {
            tracing::warn!(
                location = %ticket.location,
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale location resolution"
            );
            return false;
        }
        self.climate = Some(context);
        true
    }

    /// Resolve `location` against the catalogue synchronously
    pub fn resolve_location(&mut self, location: impl Into<String>) -> Option<&ClimateContext> {
        let ticket = self.begin_resolution(location);
        let context = self.catalog.lookup_climate(ticket.location(), self.clock.now());
        self.complete_resolution(ticket, context);
        self.climate.as_ref()
    }

    /// Add a favourite; blank names are ignored
    pub fn add_favorite(&mut self, name: &str) -> Result<Option<&FavoriteLocation>, DashboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let favorite = FavoriteLocation {
            id: self.fresh_id(|id| self.favorites.iter().any(|f| f.id == id)),
            name: name.to_string(),
            added_at: self.clock.now(),
        };
        self.favorites.push(favorite);
        self.save_favorites()?;
        Ok(self.favorites.last())
    }

    pub fn remove_favorite(&mut self, id: &str) -> Result<(), DashboardError> {
        let before = self.favorites.len();
        self.favorites.retain(|favorite| favorite.id != id);
        if self.favorites.len() == before {
            return Err(DashboardError::FavoriteNotFound(id.to_string()));
        }
        self.save_favorites()
    }
}
