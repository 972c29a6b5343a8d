//! Climate lookups over the catalogue

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{Catalog, ClimateContext, ClimateZone, LocationClimateData, Recommendations};

use crate::error::{AppError, AppResult};

/// Read-only climate queries
#[derive(Clone)]
pub struct ClimateService {
    catalog: Arc<Catalog>,
}

impl ClimateService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn zones(&self) -> Vec<ClimateZone> {
        self.catalog.zones().to_vec()
    }

    pub fn zone(&self, zone_id: &str) -> AppResult<ClimateZone> {
        self.catalog
            .lookup_zone(zone_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Climate zone".to_string()))
    }

    pub fn locations(&self) -> Vec<LocationClimateData> {
        self.catalog.locations().to_vec()
    }

    /// Climate context for a location; unknown places degrade to the default zone
    pub fn lookup(&self, location: &str, now: DateTime<Utc>) -> ClimateContext {
        let context = self.catalog.lookup_climate(location, now);
        tracing::debug!(
            location = %location,
            zone = ?context.zone_id(),
            season = ?context.current_season,
            "Climate lookup"
        );
        context
    }

    /// Seasonal recommendations, or `None` when the season is unknown for the zone
    pub fn recommendations(&self, location: &str, now: DateTime<Utc>) -> Option<Recommendations> {
        let context = self.lookup(location, now);
        let zone = context.climate_zone.as_ref()?;
        let season = context.current_season.as_deref()?;
        shared::recommend(zone, season, &context.climate_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> ClimateService {
        ClimateService::new(Arc::new(Catalog::builtin().unwrap()))
    }

    #[test]
    fn test_zone_not_found() {
        assert!(matches!(service().zone("lunar"), Err(AppError::NotFound(_))));
        assert_eq!(service().zone("monsoon").unwrap().name, "Monsoon");
    }

    #[test]
    fn test_recommendations_for_known_location() {
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        let recs = service().recommendations("Reykjavik", now).unwrap();
        assert_eq!(recs.clothing.len(), 3);
        assert_eq!(recs.activities.len(), 3);
    }
}
