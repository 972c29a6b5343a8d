//! Static climate and template catalogue
//!
//! All catalogue data ships embedded in the crate and is parsed once into an immutable
//! [`Catalog`]. Hosts may substitute any of the five documents (for example the backend
//! reads overrides from its configured catalogue directory).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    AdaptiveSeasonalTemplate, ClimateContext, ClimateZone, LocationClimateData, Season,
    SeasonalTemplate, TemplateCategory, TemplateKind, TemplateWidget, WidgetTemplate,
};
use crate::season::{adjusted_month, resolve_season, SeasonTable};
use crate::types::{Coordinates, Hemisphere};

/// Zone assumed for locations missing from the lookup table
pub const DEFAULT_ZONE_ID: &str = "temperate-continental";

const CLIMATE_ZONES_JSON: &str = include_str!("../data/climate_zones.json");
const LOCATIONS_JSON: &str = include_str!("../data/locations.json");
const LAYOUT_TEMPLATES_JSON: &str = include_str!("../data/layout_templates.json");
const SEASONAL_TEMPLATES_JSON: &str = include_str!("../data/seasonal_templates.json");
const ADAPTIVE_TEMPLATES_JSON: &str = include_str!("../data/adaptive_templates.json");

/// Catalogue errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse {document}: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalogue has {} consistency issue(s)", .0.len())]
    Inconsistent(Vec<CatalogIssue>),
}

/// A configuration problem found by [`Catalog::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    UnknownZone { location: String, zone_id: String },
    InvalidCoordinates { location: String, reason: &'static str },
    MonthOutOfRange { zone_id: String, season: String, month: u32 },
    MonthUncovered { zone_id: String, month: u32 },
    MonthOverlap { zone_id: String, month: u32 },
    EmptyWidgetTitle { kind: TemplateKind, template_id: String, index: usize },
    UnknownAdaptationZone { template_id: String, zone_id: String },
    DuplicateTemplateId { kind: TemplateKind, template_id: String },
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::UnknownZone { location, zone_id } => {
                write!(f, "location '{location}' references undefined zone '{zone_id}'")
            }
            CatalogIssue::InvalidCoordinates { location, reason } => {
                write!(f, "location '{location}': {reason}")
            }
            CatalogIssue::MonthOutOfRange { zone_id, season, month } => {
                write!(f, "zone '{zone_id}' season '{season}' lists month {month}")
            }
            CatalogIssue::MonthUncovered { zone_id, month } => {
                write!(f, "zone '{zone_id}' has no season for month {month}")
            }
            CatalogIssue::MonthOverlap { zone_id, month } => {
                write!(f, "zone '{zone_id}' covers month {month} more than once")
            }
            CatalogIssue::EmptyWidgetTitle { kind, template_id, index } => {
                write!(f, "{kind} template '{template_id}' widget #{index} has an empty title")
            }
            CatalogIssue::UnknownAdaptationZone { template_id, zone_id } => {
                write!(f, "adaptive template '{template_id}' adapts undefined zone '{zone_id}'")
            }
            CatalogIssue::DuplicateTemplateId { kind, template_id } => {
                write!(f, "{kind} template id '{template_id}' is defined more than once")
            }
        }
    }
}

/// Raw JSON documents; `None` means "use the embedded copy"
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    pub climate_zones: Option<String>,
    pub locations: Option<String>,
    pub layout_templates: Option<String>,
    pub seasonal_templates: Option<String>,
    pub adaptive_templates: Option<String>,
}

fn parse<T: serde::de::DeserializeOwned>(
    document: &'static str,
    override_json: Option<&str>,
    embedded: &str,
) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(override_json.unwrap_or(embedded))
        .map_err(|source| CatalogError::Parse { document, source })
}

/// Immutable catalogue of zones, locations and templates
#[derive(Debug, Clone)]
pub struct Catalog {
    zones: Vec<ClimateZone>,
    locations: Vec<LocationClimateData>,
    layouts: Vec<WidgetTemplate>,
    seasonal: Vec<SeasonalTemplate>,
    adaptive: Vec<AdaptiveSeasonalTemplate>,
    location_index: HashMap<String, usize>,
}

impl Catalog {
    /// Catalogue built from the embedded documents
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_sources(&CatalogSources::default())
    }

    pub fn from_sources(sources: &CatalogSources) -> Result<Self, CatalogError> {
        let zones = parse(
            "climate_zones.json",
            sources.climate_zones.as_deref(),
            CLIMATE_ZONES_JSON,
        )?;
        let locations: Vec<LocationClimateData> =
            parse("locations.json", sources.locations.as_deref(), LOCATIONS_JSON)?;
        let layouts = parse(
            "layout_templates.json",
            sources.layout_templates.as_deref(),
            LAYOUT_TEMPLATES_JSON,
        )?;
        let seasonal = parse(
            "seasonal_templates.json",
            sources.seasonal_templates.as_deref(),
            SEASONAL_TEMPLATES_JSON,
        )?;
        let adaptive = parse(
            "adaptive_templates.json",
            sources.adaptive_templates.as_deref(),
            ADAPTIVE_TEMPLATES_JSON,
        )?;

        // First entry wins on case-insensitive duplicates
        let mut location_index = HashMap::new();
        for (index, location) in locations.iter().enumerate() {
            location_index
                .entry(location.location.to_lowercase())
                .or_insert(index);
        }

        Ok(Self {
            zones,
            locations,
            layouts,
            seasonal,
            adaptive,
            location_index,
        })
    }

    pub fn zones(&self) -> &[ClimateZone] {
        &self.zones
    }

    pub fn locations(&self) -> &[LocationClimateData] {
        &self.locations
    }

    pub fn layouts(&self) -> &[WidgetTemplate] {
        &self.layouts
    }

    pub fn seasonal_templates(&self) -> &[SeasonalTemplate] {
        &self.seasonal
    }

    pub fn adaptive_templates(&self) -> &[AdaptiveSeasonalTemplate] {
        &self.adaptive
    }

    pub fn lookup_zone(&self, zone_id: &str) -> Option<&ClimateZone> {
        self.zones.iter().find(|zone| zone.id == zone_id)
    }

    /// Case-insensitive exact match against the location table
    pub fn find_location(&self, name: &str) -> Option<&LocationClimateData> {
        self.location_index
            .get(&name.to_lowercase())
            .and_then(|index| self.locations.get(*index))
    }

    /// Location record, or a synthetic default carrying the queried name
    pub fn lookup_location(&self, name: &str) -> LocationClimateData {
        match self.find_location(name) {
            Some(data) => data.clone(),
            None => LocationClimateData {
                location: name.to_string(),
                coordinates: Coordinates::origin(),
                climate_zone: DEFAULT_ZONE_ID.to_string(),
                hemisphere: Hemisphere::Northern,
                time_zone: "UTC".to_string(),
                elevation: None,
                coastal_influence: false,
                urban_heat_island: false,
            },
        }
    }

    /// Climate context for `name` at `now`
    ///
    /// Known locations resolve their season from their zone's own table; unknown ones
    /// fall back to the default zone with the fixed four-season calendar.
    pub fn lookup_climate(&self, name: &str, now: DateTime<Utc>) -> ClimateContext {
        match self.find_location(name) {
            Some(data) => {
                let zone = self.lookup_zone(&data.climate_zone).cloned();
                let season = zone
                    .as_ref()
                    .and_then(|zone| resolve_season(SeasonTable::Zone(zone), data.hemisphere, now));
                if zone.is_none() {
                    tracing::warn!(
                        location = %data.location,
                        zone = %data.climate_zone,
                        "Location references an undefined climate zone"
                    );
                }
                ClimateContext::new(data.clone(), zone, season)
            }
            None => {
                tracing::debug!(location = %name, "Unknown location, using default climate");
                let data = self.lookup_location(name);
                let zone = self.lookup_zone(DEFAULT_ZONE_ID).cloned();
                let season = resolve_season(SeasonTable::Default, data.hemisphere, now);
                ClimateContext::new(data, zone, season)
            }
        }
    }

    pub fn layout(&self, id: &str) -> Option<&WidgetTemplate> {
        self.layouts.iter().find(|template| template.id == id)
    }

    pub fn seasonal(&self, id: &str) -> Option<&SeasonalTemplate> {
        self.seasonal.iter().find(|template| template.id == id)
    }

    pub fn adaptive(&self, id: &str) -> Option<&AdaptiveSeasonalTemplate> {
        self.adaptive.iter().find(|template| template.id == id)
    }

    /// Layout templates, optionally restricted to one category
    pub fn layouts_in(&self, category: Option<TemplateCategory>) -> Vec<&WidgetTemplate> {
        self.layouts
            .iter()
            .filter(|template| category.map_or(true, |c| template.category == c))
            .collect()
    }

    /// Seasonal templates, optionally restricted to one season
    pub fn seasonal_in(&self, season: Option<Season>) -> Vec<&SeasonalTemplate> {
        self.seasonal
            .iter()
            .filter(|template| season.map_or(true, |s| template.season == s))
            .collect()
    }

    /// Seasonal templates whose auto-activation window covers `now` for `hemisphere`
    ///
    /// Windows are written in northern reckoning, so a southern location's month is
    /// shifted before matching; a template restricted to one hemisphere never activates
    /// for the other.
    pub fn auto_activated(&self, now: DateTime<Utc>, hemisphere: Hemisphere) -> Vec<&SeasonalTemplate> {
        use chrono::Datelike;

        let month = adjusted_month(now.month(), hemisphere);
        self.seasonal
            .iter()
            .filter(|template| {
                let window = &template.auto_activate;
                window.hemisphere.includes(hemisphere) && window.months.contains(&month)
            })
            .collect()
    }

    /// Configuration problems in the loaded data; empty when consistent
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for location in &self.locations {
            if self.lookup_zone(&location.climate_zone).is_none() {
                issues.push(CatalogIssue::UnknownZone {
                    location: location.location.clone(),
                    zone_id: location.climate_zone.clone(),
                });
            }
            if let Err(reason) = crate::validation::validate_coordinates(&location.coordinates) {
                issues.push(CatalogIssue::InvalidCoordinates {
                    location: location.location.clone(),
                    reason,
                });
            }
        }

        for zone in &self.zones {
            let mut coverage = [0u32; 12];
            for (season, profile) in &zone.seasons {
                for &month in &profile.months {
                    if crate::validation::validate_month(month).is_err() {
                        issues.push(CatalogIssue::MonthOutOfRange {
                            zone_id: zone.id.clone(),
                            season: season.clone(),
                            month,
                        });
                        continue;
                    }
                    coverage[(month - 1) as usize] += 1;
                }
            }
            for (offset, count) in coverage.iter().enumerate() {
                let month = offset as u32 + 1;
                match count {
                    0 => issues.push(CatalogIssue::MonthUncovered {
                        zone_id: zone.id.clone(),
                        month,
                    }),
                    1 => {}
                    _ => issues.push(CatalogIssue::MonthOverlap {
                        zone_id: zone.id.clone(),
                        month,
                    }),
                }
            }
        }

        let mut check_widgets = |kind: TemplateKind, template_id: &str, widgets: &[TemplateWidget]| {
            for (index, widget) in widgets.iter().enumerate() {
                if widget.title.trim().is_empty() {
                    issues.push(CatalogIssue::EmptyWidgetTitle {
                        kind,
                        template_id: template_id.to_string(),
                        index,
                    });
                }
            }
        };
        for template in &self.layouts {
            check_widgets(TemplateKind::Layout, &template.id, &template.widgets);
        }
        for template in &self.seasonal {
            check_widgets(TemplateKind::Seasonal, &template.id, &template.widgets);
        }
        for template in &self.adaptive {
            check_widgets(TemplateKind::Adaptive, &template.id, &template.widgets);
            for adaptation in template.adaptations.values() {
                check_widgets(
                    TemplateKind::Adaptive,
                    &template.id,
                    &adaptation.additional_widgets,
                );
            }
        }

        for template in &self.adaptive {
            for zone_id in template.adaptations.keys() {
                if self.lookup_zone(zone_id).is_none() {
                    issues.push(CatalogIssue::UnknownAdaptationZone {
                        template_id: template.id.clone(),
                        zone_id: zone_id.clone(),
                    });
                }
            }
        }

        let ids = self
            .layouts
            .iter()
            .map(|t| (TemplateKind::Layout, t.id.as_str()))
            .chain(self.seasonal.iter().map(|t| (TemplateKind::Seasonal, t.id.as_str())))
            .chain(self.adaptive.iter().map(|t| (TemplateKind::Adaptive, t.id.as_str())));
        let mut seen = std::collections::HashSet::new();
        for (kind, id) in ids {
            if !seen.insert((kind, id)) {
                issues.push(CatalogIssue::DuplicateTemplateId {
                    kind,
                    template_id: id.to_string(),
                });
            }
        }

        issues
    }

    /// [`Catalog::validate`] as a `Result`
    pub fn ensure_consistent(&self) -> Result<(), CatalogError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Inconsistent(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivationHemisphere;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn date(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.zones().len(), 6);
        assert_eq!(catalog.locations().len(), 20);
        assert_eq!(catalog.layouts().len(), 6);
        assert_eq!(catalog.seasonal_templates().len(), 4);
        assert_eq!(catalog.adaptive_templates().len(), 1);
    }

    #[test]
    fn test_layout_previews_parse_as_lists() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.layouts().iter().all(|layout| !layout.preview.is_empty()));
        let minimal = catalog.layout("minimal-clean").unwrap();
        assert_eq!(
            minimal.preview,
            vec!["Current Weather (Large)", "Simple Forecast", "Key Metrics"]
        );

        let single = r#"[{"id":"x","name":"X","description":"","category":"minimal",
            "widgets":[],"preview":"Forecast","features":[],"popularity":1}]"#;
        let sources = CatalogSources {
            layout_templates: Some(single.to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Catalog::from_sources(&sources),
            Err(CatalogError::Parse { document: "layout_templates.json", .. })
        ));
    }

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let catalog = Catalog::builtin().unwrap();
        let issues = catalog.validate();
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
        assert!(catalog.ensure_consistent().is_ok());
    }

    #[test]
    fn test_lookup_location_is_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        let data = catalog.lookup_location("nEw YoRk");
        assert_eq!(data.location, "New York");
        assert_eq!(data.climate_zone, "temperate-continental");
        assert!(data.urban_heat_island);
    }

    #[test]
    fn test_lookup_location_miss_returns_default() {
        let catalog = Catalog::builtin().unwrap();
        let data = catalog.lookup_location("Atlantis");
        assert_eq!(data.location, "Atlantis");
        assert_eq!(data.climate_zone, DEFAULT_ZONE_ID);
        assert_eq!(data.hemisphere, Hemisphere::Northern);
        assert_eq!(data.time_zone, "UTC");
        assert_eq!(data.coordinates.lat, Decimal::ZERO);
    }

    #[test]
    fn test_lookup_climate_southern_inversion() {
        let catalog = Catalog::builtin().unwrap();
        let ctx = catalog.lookup_climate("Sydney", date(1));
        assert_eq!(ctx.current_season.as_deref(), Some("summer"));
        assert!(!ctx.is_loading);
        assert_eq!(ctx.zone_id(), Some("temperate-continental"));
    }

    #[test]
    fn test_lookup_climate_unknown_location_uses_default_table() {
        let catalog = Catalog::builtin().unwrap();
        let ctx = catalog.lookup_climate("Gotham", date(10));
        assert_eq!(ctx.zone_id(), Some(DEFAULT_ZONE_ID));
        assert_eq!(ctx.current_season.as_deref(), Some("autumn"));
        assert_eq!(ctx.climate_data.location, "Gotham");
    }

    #[test]
    fn test_lookup_climate_zone_specific_season() {
        let catalog = Catalog::builtin().unwrap();
        let ctx = catalog.lookup_climate("Mumbai", date(7));
        assert_eq!(ctx.current_season.as_deref(), Some("monsoon"));
        let ctx = catalog.lookup_climate("Reykjavik", date(12));
        assert_eq!(ctx.current_season.as_deref(), Some("polar-winter"));
    }

    #[test]
    fn test_dangling_zone_reports_loading() {
        let sources = CatalogSources {
            locations: Some(
                r#"[{"location":"Nowhere","coordinates":{"lat":1.0,"lon":2.0},
                    "climateZone":"lunar","hemisphere":"northern","timeZone":"UTC"}]"#
                    .to_string(),
            ),
            ..Default::default()
        };
        let catalog = Catalog::from_sources(&sources).unwrap();
        let ctx = catalog.lookup_climate("Nowhere", date(5));
        assert!(ctx.is_loading);
        assert!(ctx.current_season.is_none());
        assert!(catalog.validate().contains(&CatalogIssue::UnknownZone {
            location: "Nowhere".to_string(),
            zone_id: "lunar".to_string(),
        }));
    }

    #[test]
    fn test_override_parse_error_names_document() {
        let sources = CatalogSources {
            climate_zones: Some("{not json".to_string()),
            ..Default::default()
        };
        match Catalog::from_sources(&sources) {
            Err(CatalogError::Parse { document, .. }) => assert_eq!(document, "climate_zones.json"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_season_gaps_and_overlaps() {
        let sources = CatalogSources {
            climate_zones: Some(
                r#"[{"id":"odd","name":"Odd","description":"","characteristics":[],
                    "seasonalPattern":"traditional","seasons":{
                      "a":{"months":[1,2,3,4,5,6],"temperature":{"min":0,"max":1},"precipitation":"low","characteristics":[]},
                      "b":{"months":[6,7,8,9,10,13],"temperature":{"min":0,"max":1},"precipitation":"low","characteristics":[]}
                    }}]"#
                    .to_string(),
            ),
            locations: Some("[]".to_string()),
            adaptive_templates: Some("[]".to_string()),
            ..Default::default()
        };
        let catalog = Catalog::from_sources(&sources).unwrap();
        let issues = catalog.validate();
        assert!(issues.contains(&CatalogIssue::MonthOverlap { zone_id: "odd".into(), month: 6 }));
        assert!(issues.contains(&CatalogIssue::MonthUncovered { zone_id: "odd".into(), month: 11 }));
        assert!(issues.contains(&CatalogIssue::MonthUncovered { zone_id: "odd".into(), month: 12 }));
        assert!(issues.contains(&CatalogIssue::MonthOutOfRange {
            zone_id: "odd".into(),
            season: "b".into(),
            month: 13,
        }));
    }

    #[test]
    fn test_category_and_season_filters() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.layouts_in(None).len(), 6);
        let travel = catalog.layouts_in(Some(TemplateCategory::Travel));
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].id, "travel-companion");

        let winter = catalog.seasonal_in(Some(Season::Winter));
        assert_eq!(winter.len(), 1);
        assert_eq!(winter[0].id, "winter-wonderland");
    }

    #[test]
    fn test_auto_activation_respects_hemisphere() {
        let catalog = Catalog::builtin().unwrap();
        let north: Vec<_> = catalog
            .auto_activated(date(7), Hemisphere::Northern)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(north, vec!["summer-heat"]);

        // Built-in windows are northern only
        assert!(catalog
            .seasonal_templates()
            .iter()
            .all(|t| t.auto_activate.hemisphere == ActivationHemisphere::Northern));
        assert!(catalog.auto_activated(date(7), Hemisphere::Southern).is_empty());
    }
}
