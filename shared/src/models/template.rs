//! Template catalogue models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::widget::TemplateWidget;
use crate::types::Hemisphere;

/// Tailwind-style gradient and accent classes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Layout template category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Personal,
    Professional,
    Travel,
    Sports,
    Photography,
    Minimal,
}

impl std::str::FromStr for TemplateCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(TemplateCategory::Personal),
            "professional" => Ok(TemplateCategory::Professional),
            "travel" => Ok(TemplateCategory::Travel),
            "sports" => Ok(TemplateCategory::Sports),
            "photography" => Ok(TemplateCategory::Photography),
            "minimal" => Ok(TemplateCategory::Minimal),
            _ => Err("Unknown template category"),
        }
    }
}

/// Calendar season of the four-season year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn key(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" => Some(Season::Autumn),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

/// Hemispheres a seasonal template auto-activates in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivationHemisphere {
    Northern,
    Southern,
    Both,
}

impl ActivationHemisphere {
    pub fn includes(&self, hemisphere: Hemisphere) -> bool {
        match self {
            ActivationHemisphere::Both => true,
            ActivationHemisphere::Northern => hemisphere == Hemisphere::Northern,
            ActivationHemisphere::Southern => hemisphere == Hemisphere::Southern,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoActivation {
    pub months: Vec<u32>,
    pub hemisphere: ActivationHemisphere,
}

/// Generic layout template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub widgets: Vec<TemplateWidget>,
    /// One line per widget, e.g. "Forecast (Large)"
    pub preview: Vec<String>,
    pub features: Vec<String>,
    pub popularity: u32,
}

/// Fixed four-season template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub season: Season,
    pub widgets: Vec<TemplateWidget>,
    pub color_scheme: ColorScheme,
    pub features: Vec<String>,
    pub health_tips: Vec<String>,
    pub activities: Vec<String>,
    pub alerts: Vec<String>,
    pub auto_activate: AutoActivation,
}

/// Zone-specific delta applied on top of an adaptive template's base widgets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Adaptation {
    #[serde(default)]
    pub modifications: Vec<String>,
    #[serde(default)]
    pub additional_widgets: Vec<TemplateWidget>,
    /// Widget type tags to drop from the base list
    #[serde(default)]
    pub removed_widgets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
}

/// Climate-zone-aware seasonal template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveSeasonalTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Applicability tags; `"all"` matches every zone
    pub climate_zones: Vec<String>,
    pub seasons: Vec<String>,
    pub widgets: Vec<TemplateWidget>,
    /// Zone id to adaptation
    #[serde(default)]
    pub adaptations: BTreeMap<String, Adaptation>,
}

impl AdaptiveSeasonalTemplate {
    pub fn applies_to_zone(&self, zone_id: &str) -> bool {
        self.climate_zones
            .iter()
            .any(|tag| tag == "all" || tag == zone_id)
    }
}

/// Which catalogue a template belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Layout,
    Seasonal,
    Adaptive,
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateKind::Layout => write!(f, "layout"),
            TemplateKind::Seasonal => write!(f, "seasonal"),
            TemplateKind::Adaptive => write!(f, "adaptive"),
        }
    }
}

/// Anything the merge algorithm can instantiate
pub trait Template {
    fn id(&self) -> &str;
    fn widgets(&self) -> &[TemplateWidget];
    fn kind(&self) -> TemplateKind;

    /// Zone delta, only meaningful for adaptive templates
    fn adaptation_for(&self, _zone_id: &str) -> Option<&Adaptation> {
        None
    }
}

impl Template for WidgetTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn widgets(&self) -> &[TemplateWidget] {
        &self.widgets
    }

    fn kind(&self) -> TemplateKind {
        TemplateKind::Layout
    }
}

impl Template for SeasonalTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn widgets(&self) -> &[TemplateWidget] {
        &self.widgets
    }

    fn kind(&self) -> TemplateKind {
        TemplateKind::Seasonal
    }
}

impl Template for AdaptiveSeasonalTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn widgets(&self) -> &[TemplateWidget] {
        &self.widgets
    }

    fn kind(&self) -> TemplateKind {
        TemplateKind::Adaptive
    }

    fn adaptation_for(&self, zone_id: &str) -> Option<&Adaptation> {
        self.adaptations.get(zone_id)
    }
}

/// Reference to a template in one of the three catalogues
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRef {
    pub kind: TemplateKind,
    pub template_id: String,
}

impl TemplateRef {
    pub fn new(kind: TemplateKind, template_id: impl Into<String>) -> Self {
        Self {
            kind,
            template_id: template_id.into(),
        }
    }
}
