//! Widget models
//!
//! A [`TemplateWidget`] is the id-less definition stored in a template; a [`Widget`] is
//! the instantiated tile placed on a dashboard. Keeping them as separate types makes the
//! "templates never carry ids, instances always do" rule a compile-time property.

use serde::{Deserialize, Serialize};

use crate::types::{GridPosition, Theme, Units, WidgetSize};

/// Location sentinel resolved to the active dashboard location at instantiation
pub const AUTO_LOCATION: &str = "Auto";

/// Widget type tag
///
/// Known types get a variant so render dispatch is exhaustive; anything else is kept
/// verbatim in [`WidgetKind::Unknown`] and rendered as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    CurrentWeather,
    Forecast,
    TemperatureChart,
    HumidityGauge,
    WindCompass,
    UvIndex,
    AirQuality,
    SunriseSunset,
    WeatherMapMini,
    AlertsSummary,
    // Seasonal
    PollenIndex,
    HeatIndex,
    WindChill,
    SnowDepth,
    IceWarning,
    FireRisk,
    StormTracker,
    SeasonalHealth,
    SeasonalActivities,
    SeasonalAlerts,
    // Climate-adaptive
    FloodAlerts,
    DustStormTracker,
    AuroraForecast,
    MonsoonTracker,
    DroughtMonitor,
    DaylightTracker,
    AgriculturalWeather,
    WaterConservation,
    IceConditions,
    WindWarnings,
    TideTracker,
    MarineWeather,
    UrbanHeatMap,
    AltitudeWeather,
    Unknown(String),
}

/// Which renderer draws a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFamily {
    /// Core weather tiles
    Standard,
    /// Season-specific tiles
    Seasonal,
    /// Generic placeholder tile
    Placeholder,
}

impl WidgetKind {
    /// Types offered in the "add widget" picker
    pub const PICKABLE: [WidgetKind; 10] = [
        WidgetKind::CurrentWeather,
        WidgetKind::Forecast,
        WidgetKind::TemperatureChart,
        WidgetKind::HumidityGauge,
        WidgetKind::WindCompass,
        WidgetKind::UvIndex,
        WidgetKind::AirQuality,
        WidgetKind::SunriseSunset,
        WidgetKind::WeatherMapMini,
        WidgetKind::AlertsSummary,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag {
            "current-weather" => WidgetKind::CurrentWeather,
            "forecast" => WidgetKind::Forecast,
            "temperature-chart" => WidgetKind::TemperatureChart,
            "humidity-gauge" => WidgetKind::HumidityGauge,
            "wind-compass" => WidgetKind::WindCompass,
            "uv-index" => WidgetKind::UvIndex,
            "air-quality" => WidgetKind::AirQuality,
            "sunrise-sunset" => WidgetKind::SunriseSunset,
            "weather-map-mini" => WidgetKind::WeatherMapMini,
            "alerts-summary" => WidgetKind::AlertsSummary,
            "pollen-index" => WidgetKind::PollenIndex,
            "heat-index" => WidgetKind::HeatIndex,
            "wind-chill" => WidgetKind::WindChill,
            "snow-depth" => WidgetKind::SnowDepth,
            "ice-warning" => WidgetKind::IceWarning,
            "fire-risk" => WidgetKind::FireRisk,
            "storm-tracker" => WidgetKind::StormTracker,
            "seasonal-health" => WidgetKind::SeasonalHealth,
            "seasonal-activities" => WidgetKind::SeasonalActivities,
            "seasonal-alerts" => WidgetKind::SeasonalAlerts,
            "flood-alerts" => WidgetKind::FloodAlerts,
            "dust-storm-tracker" => WidgetKind::DustStormTracker,
            "aurora-forecast" => WidgetKind::AuroraForecast,
            "monsoon-tracker" => WidgetKind::MonsoonTracker,
            "drought-monitor" => WidgetKind::DroughtMonitor,
            "daylight-tracker" => WidgetKind::DaylightTracker,
            "agricultural-weather" => WidgetKind::AgriculturalWeather,
            "water-conservation" => WidgetKind::WaterConservation,
            "ice-conditions" => WidgetKind::IceConditions,
            "wind-warnings" => WidgetKind::WindWarnings,
            "tide-tracker" => WidgetKind::TideTracker,
            "marine-weather" => WidgetKind::MarineWeather,
            "urban-heat-map" => WidgetKind::UrbanHeatMap,
            "altitude-weather" => WidgetKind::AltitudeWeather,
            other => WidgetKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::CurrentWeather => "current-weather",
            WidgetKind::Forecast => "forecast",
            WidgetKind::TemperatureChart => "temperature-chart",
            WidgetKind::HumidityGauge => "humidity-gauge",
            WidgetKind::WindCompass => "wind-compass",
            WidgetKind::UvIndex => "uv-index",
            WidgetKind::AirQuality => "air-quality",
            WidgetKind::SunriseSunset => "sunrise-sunset",
            WidgetKind::WeatherMapMini => "weather-map-mini",
            WidgetKind::AlertsSummary => "alerts-summary",
            WidgetKind::PollenIndex => "pollen-index",
            WidgetKind::HeatIndex => "heat-index",
            WidgetKind::WindChill => "wind-chill",
            WidgetKind::SnowDepth => "snow-depth",
            WidgetKind::IceWarning => "ice-warning",
            WidgetKind::FireRisk => "fire-risk",
            WidgetKind::StormTracker => "storm-tracker",
            WidgetKind::SeasonalHealth => "seasonal-health",
            WidgetKind::SeasonalActivities => "seasonal-activities",
            WidgetKind::SeasonalAlerts => "seasonal-alerts",
            WidgetKind::FloodAlerts => "flood-alerts",
            WidgetKind::DustStormTracker => "dust-storm-tracker",
            WidgetKind::AuroraForecast => "aurora-forecast",
            WidgetKind::MonsoonTracker => "monsoon-tracker",
            WidgetKind::DroughtMonitor => "drought-monitor",
            WidgetKind::DaylightTracker => "daylight-tracker",
            WidgetKind::AgriculturalWeather => "agricultural-weather",
            WidgetKind::WaterConservation => "water-conservation",
            WidgetKind::IceConditions => "ice-conditions",
            WidgetKind::WindWarnings => "wind-warnings",
            WidgetKind::TideTracker => "tide-tracker",
            WidgetKind::MarineWeather => "marine-weather",
            WidgetKind::UrbanHeatMap => "urban-heat-map",
            WidgetKind::AltitudeWeather => "altitude-weather",
            WidgetKind::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WidgetKind::Unknown(_))
    }

    /// Renderer responsible for this type. Never fails: unknown tags get a placeholder.
    pub fn render_family(&self) -> RenderFamily {
        match self {
            WidgetKind::CurrentWeather
            | WidgetKind::Forecast
            | WidgetKind::TemperatureChart
            | WidgetKind::HumidityGauge
            | WidgetKind::WindCompass
            | WidgetKind::UvIndex
            | WidgetKind::AirQuality
            | WidgetKind::SunriseSunset
            | WidgetKind::WeatherMapMini
            | WidgetKind::AlertsSummary => RenderFamily::Standard,
            WidgetKind::PollenIndex
            | WidgetKind::HeatIndex
            | WidgetKind::WindChill
            | WidgetKind::SnowDepth
            | WidgetKind::IceWarning
            | WidgetKind::FireRisk
            | WidgetKind::StormTracker
            | WidgetKind::SeasonalHealth
            | WidgetKind::SeasonalActivities
            | WidgetKind::SeasonalAlerts => RenderFamily::Seasonal,
            _ => RenderFamily::Placeholder,
        }
    }

    /// Title given to a freshly added widget of this type
    pub fn default_title(&self) -> String {
        let title = match self {
            WidgetKind::CurrentWeather => "Current Weather",
            WidgetKind::Forecast => "Weather Forecast",
            WidgetKind::TemperatureChart => "Temperature Chart",
            WidgetKind::HumidityGauge => "Humidity Gauge",
            WidgetKind::WindCompass => "Wind Compass",
            WidgetKind::UvIndex => "UV Index",
            WidgetKind::AirQuality => "Air Quality",
            WidgetKind::SunriseSunset => "Sunrise & Sunset",
            WidgetKind::WeatherMapMini => "Weather Map",
            WidgetKind::AlertsSummary => "Weather Alerts",
            WidgetKind::PollenIndex => "Pollen Tracker",
            WidgetKind::HeatIndex => "Heat Index",
            WidgetKind::WindChill => "Wind Chill",
            WidgetKind::SnowDepth => "Snow Tracker",
            WidgetKind::IceWarning => "Ice Conditions",
            WidgetKind::FireRisk => "Fire Risk",
            WidgetKind::StormTracker => "Storm Tracker",
            WidgetKind::SeasonalHealth => "Seasonal Health",
            WidgetKind::SeasonalActivities => "Seasonal Activities",
            WidgetKind::SeasonalAlerts => "Seasonal Alerts",
            other => return title_case(other.as_str()),
        };
        title.to_string()
    }
}

/// "dust-storm-tracker" -> "Dust Storm Tracker"
fn title_case(tag: &str) -> String {
    tag.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<String> for WidgetKind {
    fn from(tag: String) -> Self {
        WidgetKind::parse(&tag)
    }
}

impl From<&str> for WidgetKind {
    fn from(tag: &str) -> Self {
        WidgetKind::parse(tag)
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional widget configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_icon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_details: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Seconds between refreshes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate_adapted: Option<bool>,
}

impl WidgetSettings {
    /// Settings given to a widget added by hand
    pub fn standard() -> Self {
        Self {
            show_icon: Some(true),
            show_details: Some(true),
            theme: Some(Theme::Auto),
            refresh_interval: Some(300),
            units: Some(Units::Metric),
            show_background: Some(true),
            ..Default::default()
        }
    }

    /// Copy with the climate-adaptive flags forced on
    pub fn with_adaptive_flags(&self) -> Self {
        Self {
            climate_adapted: Some(true),
            seasonal_mode: Some(true),
            ..self.clone()
        }
    }

    /// Shallow merge: keys set in `patch` win
    pub fn merged_with(&self, patch: &WidgetSettings) -> Self {
        Self {
            show_icon: patch.show_icon.or(self.show_icon),
            show_details: patch.show_details.or(self.show_details),
            theme: patch.theme.or(self.theme),
            refresh_interval: patch.refresh_interval.or(self.refresh_interval),
            units: patch.units.or(self.units),
            show_background: patch.show_background.or(self.show_background),
            seasonal_mode: patch.seasonal_mode.or(self.seasonal_mode),
            climate_adapted: patch.climate_adapted.or(self.climate_adapted),
        }
    }
}

/// Where a template widget points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationBinding {
    /// Follows the active dashboard location
    Auto,
    /// Pinned to a fixed place, e.g. a travel destination
    Fixed(String),
}

impl LocationBinding {
    pub fn resolve(&self, current_location: &str) -> String {
        match self {
            LocationBinding::Auto => current_location.to_string(),
            LocationBinding::Fixed(place) => place.clone(),
        }
    }
}

impl From<String> for LocationBinding {
    fn from(value: String) -> Self {
        if value == AUTO_LOCATION {
            LocationBinding::Auto
        } else {
            LocationBinding::Fixed(value)
        }
    }
}

impl From<LocationBinding> for String {
    fn from(binding: LocationBinding) -> Self {
        match binding {
            LocationBinding::Auto => AUTO_LOCATION.to_string(),
            LocationBinding::Fixed(place) => place,
        }
    }
}

/// Widget definition inside a template (no id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateWidget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    pub location: LocationBinding,
    pub size: WidgetSize,
    pub position: GridPosition,
    #[serde(default)]
    pub settings: WidgetSettings,
}

/// Instantiated dashboard widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    pub location: String,
    pub size: WidgetSize,
    pub position: GridPosition,
    #[serde(default)]
    pub settings: WidgetSettings,
}

impl Widget {
    pub fn render_family(&self) -> RenderFamily {
        self.kind.render_family()
    }

    /// Apply a partial update; `id` and `type` never change
    pub fn apply_patch(&self, patch: &WidgetPatch) -> Widget {
        Widget {
            id: self.id.clone(),
            kind: self.kind.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            location: patch.location.clone().unwrap_or_else(|| self.location.clone()),
            size: patch.size.unwrap_or(self.size),
            position: patch.position.unwrap_or(self.position),
            settings: match &patch.settings {
                Some(settings) => self.settings.merged_with(settings),
                None => self.settings.clone(),
            },
        }
    }
}

/// Partial widget update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPatch {
    pub title: Option<String>,
    pub location: Option<String>,
    pub size: Option<WidgetSize>,
    pub position: Option<GridPosition>,
    pub settings: Option<WidgetSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kind_roundtrips_through_tag() {
        for kind in WidgetKind::PICKABLE {
            assert_eq!(WidgetKind::parse(kind.as_str()), kind);
        }
        assert_eq!(WidgetKind::parse("aurora-forecast"), WidgetKind::AuroraForecast);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = WidgetKind::parse("volcano-ash");
        assert!(!kind.is_known());
        assert_eq!(kind.as_str(), "volcano-ash");
        assert_eq!(kind.render_family(), RenderFamily::Placeholder);
        assert_eq!(String::from(kind), "volcano-ash");
    }

    #[test]
    fn test_render_family_dispatch() {
        assert_eq!(WidgetKind::Forecast.render_family(), RenderFamily::Standard);
        assert_eq!(WidgetKind::SnowDepth.render_family(), RenderFamily::Seasonal);
        assert_eq!(WidgetKind::MonsoonTracker.render_family(), RenderFamily::Placeholder);
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(WidgetKind::SunriseSunset.default_title(), "Sunrise & Sunset");
        assert_eq!(WidgetKind::DustStormTracker.default_title(), "Dust Storm Tracker");
        assert_eq!(WidgetKind::parse("odd-type").default_title(), "Odd Type");
    }

    #[test]
    fn test_widget_json_shape() {
        let json = r#"{
            "type": "uv-index",
            "title": "UV",
            "location": "Auto",
            "size": "small",
            "position": {"x": 2, "y": 2},
            "settings": {"theme": "light", "refreshInterval": 600}
        }"#;
        let widget: TemplateWidget = serde_json::from_str(json).unwrap();
        assert_eq!(widget.kind, WidgetKind::UvIndex);
        assert_eq!(widget.location, LocationBinding::Auto);
        assert_eq!(widget.settings.refresh_interval, Some(600));
        assert_eq!(widget.settings.theme, Some(Theme::Light));

        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(value["type"], "uv-index");
        assert_eq!(value["location"], "Auto");
        assert!(value["settings"].get("showIcon").is_none());
    }

    #[test]
    fn test_location_binding_resolution() {
        assert_eq!(LocationBinding::Auto.resolve("Lima"), "Lima");
        assert_eq!(
            LocationBinding::Fixed("Paris".to_string()).resolve("Lima"),
            "Paris"
        );
    }

    #[test]
    fn test_adaptive_flags_overlay_keeps_other_keys() {
        let settings = WidgetSettings {
            theme: Some(Theme::Dark),
            seasonal_mode: Some(false),
            ..Default::default()
        };
        let adapted = settings.with_adaptive_flags();
        assert_eq!(adapted.theme, Some(Theme::Dark));
        assert_eq!(adapted.seasonal_mode, Some(true));
        assert_eq!(adapted.climate_adapted, Some(true));
    }

    #[test]
    fn test_apply_patch_merges_settings() {
        let widget = Widget {
            id: "1".to_string(),
            kind: WidgetKind::Forecast,
            title: "Forecast".to_string(),
            location: "London".to_string(),
            size: WidgetSize::Large,
            position: GridPosition::new(1, 0),
            settings: WidgetSettings::standard(),
        };
        let patch = WidgetPatch {
            title: Some("Week Ahead".to_string()),
            settings: Some(WidgetSettings {
                units: Some(Units::Imperial),
                ..Default::default()
            }),
            ..Default::default()
        };
        let updated = widget.apply_patch(&patch);
        assert_eq!(updated.id, "1");
        assert_eq!(updated.title, "Week Ahead");
        assert_eq!(updated.location, "London");
        assert_eq!(updated.settings.units, Some(Units::Imperial));
        assert_eq!(updated.settings.refresh_interval, Some(300));
    }
}
