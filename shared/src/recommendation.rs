//! Seasonal recommendation engine

use crate::models::{ClimateZone, LocationClimateData, Recommendations, SeasonalPattern, WidgetKind};

fn push_all(target: &mut Vec<String>, items: &[&str]) {
    target.extend(items.iter().map(|item| item.to_string()));
}

/// Suggestions for `season_key` in `zone`, adjusted for the location's coastal, urban
/// and altitude attributes. `None` when the zone has no such season.
///
/// Location adjustments are appended without deduplication, so a widget type can appear
/// more than once.
pub fn recommend(
    zone: &ClimateZone,
    season_key: &str,
    data: &LocationClimateData,
) -> Option<Recommendations> {
    if !zone.seasons.contains_key(season_key) {
        return None;
    }

    let mut recs = Recommendations::default();

    match zone.seasonal_pattern {
        SeasonalPattern::Tropical => {
            recs.widgets.extend([
                WidgetKind::HumidityGauge,
                WidgetKind::HeatIndex,
                WidgetKind::UvIndex,
                WidgetKind::AirQuality,
            ]);
            if season_key == "wet-season" {
                recs.widgets.extend([WidgetKind::StormTracker, WidgetKind::FloodAlerts]);
                push_all(&mut recs.alerts, &["Flooding risk", "Heavy rainfall warnings"]);
            } else {
                recs.widgets.extend([WidgetKind::FireRisk, WidgetKind::DroughtMonitor]);
                push_all(&mut recs.alerts, &["Fire weather warnings", "Drought conditions"]);
            }
        }
        SeasonalPattern::Desert => {
            recs.widgets.extend([
                WidgetKind::HeatIndex,
                WidgetKind::UvIndex,
                WidgetKind::DustStormTracker,
                WidgetKind::WaterConservation,
            ]);
            if season_key == "hot-season" {
                push_all(
                    &mut recs.health_tips,
                    &["Drink water every 15 minutes", "Avoid outdoor activities 10am-4pm"],
                );
                push_all(
                    &mut recs.clothing,
                    &[
                        "Light-colored, loose clothing",
                        "Wide-brimmed hat",
                        "UV-protective sunglasses",
                    ],
                );
            }
        }
        SeasonalPattern::Polar => {
            recs.widgets.extend([
                WidgetKind::WindChill,
                WidgetKind::AuroraForecast,
                WidgetKind::DaylightTracker,
                WidgetKind::IceConditions,
            ]);
            if season_key == "polar-winter" {
                push_all(
                    &mut recs.health_tips,
                    &[
                        "Layer clothing properly",
                        "Watch for hypothermia signs",
                        "Use vitamin D supplements",
                    ],
                );
                push_all(
                    &mut recs.clothing,
                    &["Insulated boots", "Thermal layers", "Wind-resistant outer shell"],
                );
            }
        }
        SeasonalPattern::Monsoon => {
            recs.widgets.extend([
                WidgetKind::MonsoonTracker,
                WidgetKind::FloodAlerts,
                WidgetKind::HumidityGauge,
                WidgetKind::AirQuality,
            ]);
            if season_key == "monsoon" {
                push_all(
                    &mut recs.alerts,
                    &[
                        "Flash flood warnings",
                        "Landslide risk",
                        "Vector-borne disease alerts",
                    ],
                );
                push_all(
                    &mut recs.health_tips,
                    &[
                        "Boil water before drinking",
                        "Use mosquito protection",
                        "Avoid waterlogged areas",
                    ],
                );
            }
        }
        SeasonalPattern::Mediterranean => match season_key {
            "summer" => {
                recs.widgets.extend([
                    WidgetKind::FireRisk,
                    WidgetKind::DroughtMonitor,
                    WidgetKind::HeatIndex,
                ]);
                push_all(
                    &mut recs.alerts,
                    &["Wildfire warnings", "Water restrictions", "Heat advisories"],
                );
            }
            "winter" => {
                recs.widgets.extend([WidgetKind::FloodAlerts, WidgetKind::WindWarnings]);
            }
            _ => {}
        },
        SeasonalPattern::Traditional => {
            recs.widgets.extend([
                WidgetKind::TemperatureChart,
                WidgetKind::Forecast,
                WidgetKind::SeasonalActivities,
            ]);
            match season_key {
                "winter" => recs.widgets.extend([
                    WidgetKind::WindChill,
                    WidgetKind::SnowDepth,
                    WidgetKind::IceWarning,
                ]),
                "summer" => recs.widgets.extend([
                    WidgetKind::HeatIndex,
                    WidgetKind::UvIndex,
                    WidgetKind::AirQuality,
                ]),
                _ => {}
            }
        }
    }

    if data.coastal_influence {
        recs.widgets.extend([WidgetKind::TideTracker, WidgetKind::MarineWeather]);
        push_all(
            &mut recs.activities,
            &["Beach activities", "Water sports", "Coastal walks"],
        );
    }

    if data.urban_heat_island {
        recs.widgets.extend([WidgetKind::UrbanHeatMap, WidgetKind::AirQuality]);
        push_all(
            &mut recs.health_tips,
            &[
                "Seek air-conditioned spaces during heat",
                "Be aware of higher city temperatures",
            ],
        );
    }

    if data.is_high_altitude() {
        recs.widgets.extend([WidgetKind::AltitudeWeather, WidgetKind::UvIndex]);
        push_all(
            &mut recs.health_tips,
            &["Stay hydrated at altitude", "Use extra sun protection"],
        );
    }

    Some(recs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_unknown_season_returns_none() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("monsoon").unwrap();
        let data = catalog.lookup_location("Mumbai");
        assert!(recommend(zone, "spring", &data).is_none());
        assert!(recommend(zone, "", &data).is_none());
    }

    #[test]
    fn test_tropical_wet_season_for_coastal_city() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("tropical-wet").unwrap();
        let data = catalog.lookup_location("Miami");
        let recs = recommend(zone, "wet-season", &data).unwrap();
        assert_eq!(
            recs.widgets,
            vec![
                WidgetKind::HumidityGauge,
                WidgetKind::HeatIndex,
                WidgetKind::UvIndex,
                WidgetKind::AirQuality,
                WidgetKind::StormTracker,
                WidgetKind::FloodAlerts,
                WidgetKind::TideTracker,
                WidgetKind::MarineWeather,
            ]
        );
        assert_eq!(recs.alerts, vec!["Flooding risk", "Heavy rainfall warnings"]);
        assert_eq!(recs.activities.len(), 3);
    }

    #[test]
    fn test_urban_accretion_duplicates_air_quality() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("tropical-wet").unwrap();
        let data = catalog.lookup_location("Singapore");
        let recs = recommend(zone, "dry-season", &data).unwrap();
        let air_quality = recs
            .widgets
            .iter()
            .filter(|kind| **kind == WidgetKind::AirQuality)
            .count();
        assert_eq!(air_quality, 2);
        assert_eq!(recs.alerts, vec!["Fire weather warnings", "Drought conditions"]);
        assert_eq!(recs.health_tips.len(), 2);
    }

    #[test]
    fn test_desert_hot_season_advice() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("desert-hot").unwrap();
        let data = catalog.lookup_location("Cairo");
        let recs = recommend(zone, "hot-season", &data).unwrap();
        assert_eq!(recs.health_tips[0], "Drink water every 15 minutes");
        assert_eq!(recs.clothing.len(), 3);

        let mild = recommend(zone, "mild-season", &data).unwrap();
        assert!(mild.health_tips.is_empty());
        assert!(mild.clothing.is_empty());
    }

    #[test]
    fn test_altitude_threshold_is_strict() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("temperate-continental").unwrap();
        let mut data = catalog.lookup_location("Nowhere");
        data.elevation = Some(1000);
        let recs = recommend(zone, "spring", &data).unwrap();
        assert!(!recs.widgets.contains(&WidgetKind::AltitudeWeather));

        data.elevation = Some(1001);
        let recs = recommend(zone, "spring", &data).unwrap();
        assert_eq!(
            &recs.widgets[recs.widgets.len() - 2..],
            &[WidgetKind::AltitudeWeather, WidgetKind::UvIndex]
        );
        assert_eq!(recs.health_tips, vec!["Stay hydrated at altitude", "Use extra sun protection"]);
    }

    #[test]
    fn test_mediterranean_spring_has_no_pattern_widgets() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("mediterranean").unwrap();
        let data = catalog.lookup_location("Rome");
        let recs = recommend(zone, "spring", &data).unwrap();
        assert!(recs.widgets.is_empty());

        let winter = recommend(zone, "winter", &data).unwrap();
        assert_eq!(winter.widgets, vec![WidgetKind::FloodAlerts, WidgetKind::WindWarnings]);
    }
}
