//! Climate zone and location models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Coordinates, Hemisphere};

/// How a zone's year is divided into seasons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalPattern {
    Traditional,
    Tropical,
    Desert,
    Polar,
    Mediterranean,
    Monsoon,
}

/// Relative rainfall during a season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationLevel {
    Low,
    Moderate,
    High,
}

/// Temperature band in degrees Celsius
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemperatureRange {
    pub min: i32,
    pub max: i32,
}

/// One season of a climate zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonProfile {
    /// Calendar months (1-12) belonging to the season, northern-hemisphere reckoning
    pub months: Vec<u32>,
    pub temperature: TemperatureRange,
    pub precipitation: PrecipitationLevel,
    pub characteristics: Vec<String>,
}

impl SeasonProfile {
    pub fn contains_month(&self, month: u32) -> bool {
        self.months.contains(&month)
    }
}

/// Climate zone definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClimateZone {
    pub id: String,
    pub name: String,
    pub description: String,
    pub characteristics: Vec<String>,
    pub seasonal_pattern: SeasonalPattern,
    /// Season key to profile
    pub seasons: BTreeMap<String, SeasonProfile>,
}

/// Climate attributes of a named place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationClimateData {
    pub location: String,
    pub coordinates: Coordinates,
    /// Id of a [`ClimateZone`]
    pub climate_zone: String,
    pub hemisphere: Hemisphere,
    pub time_zone: String,
    /// Metres above sea level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i32>,
    #[serde(default)]
    pub coastal_influence: bool,
    #[serde(default)]
    pub urban_heat_island: bool,
}

impl LocationClimateData {
    pub fn is_high_altitude(&self) -> bool {
        self.elevation.is_some_and(|metres| metres > 1000)
    }
}

/// Resolved climate context for the active dashboard location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClimateContext {
    pub climate_data: LocationClimateData,
    pub climate_zone: Option<ClimateZone>,
    pub current_season: Option<String>,
    /// True while the zone is unresolved
    pub is_loading: bool,
}

impl ClimateContext {
    pub fn new(
        climate_data: LocationClimateData,
        climate_zone: Option<ClimateZone>,
        current_season: Option<String>,
    ) -> Self {
        let is_loading = climate_zone.is_none();
        Self {
            climate_data,
            climate_zone,
            current_season,
            is_loading,
        }
    }

    pub fn zone_id(&self) -> Option<&str> {
        self.climate_zone.as_ref().map(|zone| zone.id.as_str())
    }
}
