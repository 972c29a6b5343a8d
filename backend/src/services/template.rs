//! Template catalogue queries

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{
    current_default_season, preview_adaptation, AdaptationPreview, AdaptiveSeasonalTemplate,
    Catalog, Season, SeasonalTemplate, TemplateCategory, WidgetTemplate,
};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct TemplateService {
    catalog: Arc<Catalog>,
}

impl TemplateService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Layout templates; `None` or `"all"` lists every category
    pub fn layouts(&self, category: Option<&str>) -> AppResult<Vec<WidgetTemplate>> {
        let category = match category {
            None | Some("all") => None,
            Some(raw) => Some(raw.parse::<TemplateCategory>().map_err(|msg| {
                AppError::Validation {
                    field: "category".to_string(),
                    message: msg.to_string(),
                }
            })?),
        };
        Ok(self.catalog.layouts_in(category).into_iter().cloned().collect())
    }

    /// Seasonal templates; `"current"` means the calendar season at `now`
    pub fn seasonal(&self, season: Option<&str>, now: DateTime<Utc>) -> AppResult<Vec<SeasonalTemplate>> {
        let season = match season {
            None | Some("all") => None,
            Some("current") => Some(current_default_season(now)),
            Some(raw) => Some(Season::from_key(raw).ok_or_else(|| AppError::Validation {
                field: "season".to_string(),
                message: "Unknown season".to_string(),
            })?),
        };
        Ok(self.catalog.seasonal_in(season).into_iter().cloned().collect())
    }

    /// Seasonal templates whose auto-activation window covers `now` at `location`
    pub fn active_seasonal(&self, location: &str, now: DateTime<Utc>) -> Vec<SeasonalTemplate> {
        let hemisphere = self.catalog.lookup_location(location).hemisphere;
        self.catalog
            .auto_activated(now, hemisphere)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Adaptive templates, narrowed to those covering `location`'s zone when given
    pub fn adaptive(&self, location: Option<&str>) -> Vec<AdaptiveSeasonalTemplate> {
        let zone_id = location.map(|name| self.catalog.lookup_location(name).climate_zone);
        self.catalog
            .adaptive_templates()
            .iter()
            .filter(|template| {
                zone_id
                    .as_deref()
                    .map_or(true, |zone_id| template.applies_to_zone(zone_id))
            })
            .cloned()
            .collect()
    }

    /// How an adaptive template would adapt to `location`'s zone
    pub fn preview(&self, template_id: &str, location: &str) -> AppResult<AdaptationPreview> {
        let template = self
            .catalog
            .adaptive(template_id)
            .ok_or_else(|| AppError::NotFound("Adaptive template".to_string()))?;
        let zone_id = self.catalog.lookup_location(location).climate_zone;
        Ok(preview_adaptation(template, &zone_id))
    }
}
