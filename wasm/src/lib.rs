//! WebAssembly module for the weather dashboard
//!
//! Runs the shared composition engine in the browser:
//! - Climate lookup and seasonal recommendations
//! - Template listing and application
//! - A `localStorage`-backed dashboard controller
//!
//! Values cross the boundary as JSON strings.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{
    Catalog, ClimateContext, Clock, Dashboard, DashboardStore, ResolutionTicket, StoreError,
    TemplateRef,
};

const WIDGETS_KEY: &str = "weather-widgets";
const FAVORITES_KEY: &str = "weather-favorites";

static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();

fn catalog() -> Result<Arc<Catalog>, String> {
    if let Some(catalog) = CATALOG.get() {
        return Ok(catalog.clone());
    }
    let catalog = Arc::new(Catalog::builtin().map_err(|e| e.to_string())?);
    Ok(CATALOG.get_or_init(|| catalog).clone())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn parse_kind(kind: &str) -> Result<TemplateKind, String> {
    match kind {
        "layout" => Ok(TemplateKind::Layout),
        "seasonal" => Ok(TemplateKind::Seasonal),
        "adaptive" => Ok(TemplateKind::Adaptive),
        other => Err(format!("Unknown template kind: {}", other)),
    }
}

/// Browser wall clock
pub struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

// ============================================================================
// Pure helpers
// ============================================================================

fn climate_json(location: &str, now: DateTime<Utc>) -> Result<String, String> {
    to_json(&catalog()?.lookup_climate(location, now))
}

fn recommendations_json(location: &str, now: DateTime<Utc>) -> Result<String, String> {
    let context = catalog()?.lookup_climate(location, now);
    let recs = match (&context.climate_zone, context.current_season.as_deref()) {
        (Some(zone), Some(season)) => shared::recommend(zone, season, &context.climate_data),
        _ => None,
    };
    to_json(&recs)
}

fn templates_json(kind: &str) -> Result<String, String> {
    let catalog = catalog()?;
    match parse_kind(kind)? {
        TemplateKind::Layout => to_json(catalog.layouts()),
        TemplateKind::Seasonal => to_json(catalog.seasonal_templates()),
        TemplateKind::Adaptive => to_json(catalog.adaptive_templates()),
    }
}

fn applied_json(
    kind: &str,
    template_id: &str,
    location: &str,
    now: DateTime<Utc>,
) -> Result<String, String> {
    let catalog = catalog()?;
    let climate = catalog.lookup_climate(location, now);
    let missing = || format!("No {} template with id '{}'", kind, template_id);

    let widgets = match parse_kind(kind)? {
        TemplateKind::Layout => {
            let template = catalog.layout(template_id).ok_or_else(missing)?;
            shared::apply_template(template, Some(&climate), location, now)
        }
        TemplateKind::Seasonal => {
            let template = catalog.seasonal(template_id).ok_or_else(missing)?;
            shared::apply_template(template, Some(&climate), location, now)
        }
        TemplateKind::Adaptive => {
            let template = catalog.adaptive(template_id).ok_or_else(missing)?;
            shared::apply_template(template, Some(&climate), location, now)
        }
    };
    to_json(&widgets)
}

fn pickable_json() -> Result<String, String> {
    to_json(&WidgetKind::PICKABLE)
}

fn render_family_name(kind: &str) -> &'static str {
    match WidgetKind::parse(kind).render_family() {
        RenderFamily::Standard => "standard",
        RenderFamily::Seasonal => "seasonal",
        RenderFamily::Placeholder => "placeholder",
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Climate context for a location as JSON
#[wasm_bindgen(js_name = lookupClimate)]
pub fn lookup_climate(location: &str) -> Result<String, JsValue> {
    climate_json(location, JsClock.now()).map_err(js_error)
}

/// Recommendations for a location's current season, or `null`
#[wasm_bindgen(js_name = seasonalRecommendations)]
pub fn seasonal_recommendations(location: &str) -> Result<String, JsValue> {
    recommendations_json(location, JsClock.now()).map_err(js_error)
}

/// Templates of one kind: "layout", "seasonal" or "adaptive"
#[wasm_bindgen(js_name = listTemplates)]
pub fn list_templates(kind: &str) -> Result<String, JsValue> {
    templates_json(kind).map_err(js_error)
}

/// Widgets a template would produce at `location`
#[wasm_bindgen(js_name = applyTemplate)]
pub fn apply_template(kind: &str, template_id: &str, location: &str) -> Result<String, JsValue> {
    applied_json(kind, template_id, location, JsClock.now()).map_err(js_error)
}

/// Widget type tags offered by the "add widget" picker, as a JSON array
#[wasm_bindgen(js_name = pickableWidgetTypes)]
pub fn pickable_widget_types() -> Result<String, JsValue> {
    pickable_json().map_err(js_error)
}

/// Renderer for a widget type tag
#[wasm_bindgen(js_name = widgetRenderFamily)]
pub fn widget_render_family(kind: &str) -> String {
    render_family_name(kind).to_string()
}

// ============================================================================
// localStorage store
// ============================================================================

/// Dashboard state kept in the browser's `localStorage`
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage missing".to_string()))
    }

    fn load<T: serde::de::DeserializeOwned>(key: &str) -> Result<Option<T>, StoreError> {
        let raw = Self::storage()?
            .get_item(key)
            .map_err(|_| StoreError::Backend(format!("failed to read {}", key)))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        Self::storage()?
            .set_item(key, &raw)
            .map_err(|_| StoreError::Backend(format!("failed to write {}", key)))
    }
}

impl DashboardStore for LocalStorageStore {
    fn load_widgets(&self) -> Result<Option<Vec<Widget>>, StoreError> {
        Self::load(WIDGETS_KEY)
    }

    fn save_widgets(&mut self, widgets: &[Widget]) -> Result<(), StoreError> {
        Self::save(WIDGETS_KEY, widgets)
    }

    fn load_favorites(&self) -> Result<Option<Vec<FavoriteLocation>>, StoreError> {
        Self::load(FAVORITES_KEY)
    }

    fn save_favorites(&mut self, favorites: &[FavoriteLocation]) -> Result<(), StoreError> {
        Self::save(FAVORITES_KEY, favorites)
    }
}

// ============================================================================
// Dashboard controller
// ============================================================================

/// Browser dashboard persisted in `localStorage`
///
/// Location resolution is split so the page can fetch climate data asynchronously:
/// `beginResolution` hands out a generation number and `completeResolution` installs the
/// result only if no newer resolution has started since.
#[wasm_bindgen]
pub struct WidgetDashboard {
    inner: Dashboard<LocalStorageStore, JsClock>,
    pending: Vec<ResolutionTicket>,
}

#[wasm_bindgen]
impl WidgetDashboard {
    #[wasm_bindgen(constructor)]
    pub fn new(location: Option<String>) -> Result<WidgetDashboard, JsValue> {
        let catalog = catalog().map_err(js_error)?;
        let location = location.unwrap_or_else(|| shared::DEFAULT_LOCATION.to_string());
        let inner = Dashboard::open(catalog, LocalStorageStore, JsClock, location)
            .map_err(|e| js_error(e.to_string()))?;
        Ok(Self {
            inner,
            pending: Vec::new(),
        })
    }

    pub fn widgets(&self) -> Result<String, JsValue> {
        to_json(self.inner.widgets()).map_err(js_error)
    }

    pub fn favorites(&self) -> Result<String, JsValue> {
        to_json(self.inner.favorites()).map_err(js_error)
    }

    pub fn location(&self) -> String {
        self.inner.location().to_string()
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    /// Resolved climate context, or `null` while loading
    pub fn climate(&self) -> Result<String, JsValue> {
        to_json(&self.inner.climate()).map_err(js_error)
    }

    pub fn recommendations(&self) -> Result<String, JsValue> {
        to_json(&self.inner.recommendations()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = addWidget)]
    pub fn add_widget(&mut self, kind: &str) -> Result<String, JsValue> {
        let widget = self
            .inner
            .add_widget(WidgetKind::parse(kind))
            .map_err(|e| js_error(e.to_string()))?;
        to_json(widget).map_err(js_error)
    }

    #[wasm_bindgen(js_name = removeWidget)]
    pub fn remove_widget(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.remove_widget(id).map_err(|e| js_error(e.to_string()))
    }

    /// Apply a JSON `WidgetPatch` to a widget
    #[wasm_bindgen(js_name = updateWidget)]
    pub fn update_widget(&mut self, id: &str, patch: &str) -> Result<String, JsValue> {
        let patch: WidgetPatch =
            serde_json::from_str(patch).map_err(|e| js_error(format!("Invalid patch JSON: {}", e)))?;
        validate_widget_patch(&patch).map_err(|msg| js_error(msg.to_string()))?;
        let widget = self
            .inner
            .update_widget(id, &patch)
            .map_err(|e| js_error(e.to_string()))?;
        to_json(widget).map_err(js_error)
    }

    /// Replace the widgets with a template; `false` while the climate is loading
    #[wasm_bindgen(js_name = applyTemplate)]
    pub fn apply_template(&mut self, kind: &str, template_id: &str) -> Result<bool, JsValue> {
        let template = TemplateRef::new(parse_kind(kind).map_err(js_error)?, template_id);
        self.inner
            .apply_template(&template)
            .map_err(|e| js_error(e.to_string()))
    }

    /// Switch location and resolve it from the built-in catalogue
    #[wasm_bindgen(js_name = resolveLocation)]
    pub fn resolve_location(&mut self, location: &str) {
        self.pending.clear();
        self.inner.resolve_location(location);
    }

    #[wasm_bindgen(js_name = beginResolution)]
    pub fn begin_resolution(&mut self, location: &str) -> f64 {
        let ticket = self.inner.begin_resolution(location);
        let generation = ticket.generation();
        self.pending.push(ticket);
        generation as f64
    }

    /// Install a JSON `ClimateContext` for the resolution numbered `generation`
    #[wasm_bindgen(js_name = completeResolution)]
    pub fn complete_resolution(&mut self, generation: f64, context: &str) -> Result<bool, JsValue> {
        let context: ClimateContext = serde_json::from_str(context)
            .map_err(|e| js_error(format!("Invalid climate JSON: {}", e)))?;

        let Some(index) = self
            .pending
            .iter()
            .position(|ticket| ticket.generation() as f64 == generation)
        else {
            return Ok(false);
        };
        let ticket = self.pending.remove(index);
        let location = ticket.location().to_string();

        let installed = self.inner.complete_resolution(ticket, context);
        if installed {
            self.pending.clear();
        } else {
            web_sys::console::warn_1(
                &format!("Discarding stale climate resolution for {}", location).into(),
            );
        }
        Ok(installed)
    }

    #[wasm_bindgen(js_name = addFavorite)]
    pub fn add_favorite(&mut self, name: &str) -> Result<Option<String>, JsValue> {
        let added = self
            .inner
            .add_favorite(name)
            .map_err(|e| js_error(e.to_string()))?;
        added.map(to_json).transpose().map_err(js_error)
    }

    #[wasm_bindgen(js_name = removeFavorite)]
    pub fn remove_favorite(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner
            .remove_favorite(id)
            .map_err(|e| js_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_render_family_names() {
        assert_eq!(render_family_name("forecast"), "standard");
        assert_eq!(render_family_name("snow-depth"), "seasonal");
        assert_eq!(render_family_name("aurora-forecast"), "placeholder");
        assert_eq!(render_family_name("volcano-ash"), "placeholder");
    }

    #[test]
    fn test_pickable_json_lists_known_tags() {
        let tags: Vec<String> = serde_json::from_str(&pickable_json().unwrap()).unwrap();
        assert_eq!(tags.len(), 10);
        assert_eq!(tags[0], "current-weather");
        assert!(tags.iter().all(|tag| render_family_name(tag) == "standard"));
    }

    #[test]
    fn test_climate_json_for_southern_city() {
        let json = climate_json("Sydney", january()).unwrap();
        let context: ClimateContext = serde_json::from_str(&json).unwrap();
        assert_eq!(context.current_season.as_deref(), Some("summer"));
        assert!(json.contains("\"isLoading\":false"));
    }

    #[test]
    fn test_recommendations_json() {
        let json = recommendations_json("Reykjavik", january()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["clothing"].as_array().map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_templates_json_by_kind() {
        let layouts: serde_json::Value = serde_json::from_str(&templates_json("layout").unwrap()).unwrap();
        assert_eq!(layouts.as_array().map(|t| t.len()), Some(6));
        assert!(templates_json("gadget").is_err());
    }

    #[test]
    fn test_applied_json_binds_location() {
        let json = applied_json("adaptive", "universal-seasonal", "Cairo", january()).unwrap();
        let widgets: Vec<Widget> = serde_json::from_str(&json).unwrap();
        assert!(widgets.iter().all(|w| w.location == "Cairo"));
        assert!(applied_json("layout", "missing", "Cairo", january()).is_err());
    }
}
