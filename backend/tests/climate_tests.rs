//! Climate resolution tests
//!
//! Covers season lookup, hemisphere handling, the unknown-location fallback and the
//! seasonal recommendation rules.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    adjusted_month, recommend, resolve_season_for_month, Catalog, Hemisphere, SeasonTable,
    WidgetKind, DEFAULT_ZONE_ID,
};

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn in_month(month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, 15, 12, 0, 0).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let issues = catalog().validate();
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_known_location_uses_zone_table() {
        let context = catalog().lookup_climate("Mumbai", in_month(7));
        assert_eq!(context.zone_id(), Some("monsoon"));
        assert_eq!(context.current_season.as_deref(), Some("monsoon"));
        assert!(!context.is_loading);
    }

    #[test]
    fn test_location_lookup_ignores_case() {
        let context = catalog().lookup_climate("reYKJavik", in_month(1));
        assert_eq!(context.climate_data.location, "Reykjavik");
        assert_eq!(context.current_season.as_deref(), Some("polar-winter"));
    }

    #[test]
    fn test_southern_location_is_shifted() {
        // January in Sydney reads as July in the northern table
        let context = catalog().lookup_climate("Sydney", in_month(1));
        assert_eq!(context.climate_data.hemisphere, Hemisphere::Southern);
        assert_eq!(context.current_season.as_deref(), Some("summer"));

        let context = catalog().lookup_climate("Sydney", in_month(7));
        assert_eq!(context.current_season.as_deref(), Some("winter"));
    }

    #[test]
    fn test_unknown_location_falls_back_to_default_zone() {
        let context = catalog().lookup_climate("Atlantis", in_month(10));
        assert_eq!(context.climate_data.location, "Atlantis");
        assert_eq!(context.climate_data.climate_zone, DEFAULT_ZONE_ID);
        assert_eq!(context.climate_data.time_zone, "UTC");
        assert_eq!(context.current_season.as_deref(), Some("autumn"));
        assert!(!context.is_loading);
    }

    #[test]
    fn test_desert_hot_season_recommendations() {
        let catalog = catalog();
        let context = catalog.lookup_climate("Dubai", in_month(7));
        let zone = context.climate_zone.as_ref().unwrap();
        let recs = recommend(zone, "hot-season", &context.climate_data).unwrap();

        assert!(recs.widgets.contains(&WidgetKind::DustStormTracker));
        assert!(recs
            .health_tips
            .contains(&"Drink water every 15 minutes".to_string()));
        assert_eq!(recs.clothing.len(), 3);
    }

    #[test]
    fn test_coastal_location_gets_marine_widgets() {
        let catalog = catalog();
        let context = catalog.lookup_climate("Mumbai", in_month(7));
        let zone = context.climate_zone.as_ref().unwrap();
        let recs = recommend(zone, "monsoon", &context.climate_data).unwrap();

        assert!(recs.widgets.contains(&WidgetKind::TideTracker));
        assert!(recs.widgets.contains(&WidgetKind::MarineWeather));
    }

    #[test]
    fn test_unknown_season_has_no_recommendations() {
        let catalog = catalog();
        let zone = catalog.lookup_zone("desert-hot").unwrap();
        let data = catalog.lookup_location("Dubai");
        assert!(recommend(zone, "spring", &data).is_none());
    }

    #[test]
    fn test_auto_activation_respects_hemisphere() {
        let catalog = catalog();
        let july = in_month(7);

        let north: Vec<_> = catalog
            .auto_activated(july, Hemisphere::Northern)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(north, vec!["summer-heat"]);

        // Built-in windows are all northern-only
        assert!(catalog.auto_activated(july, Hemisphere::Southern).is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating calendar months
    fn month_strategy() -> impl Strategy<Value = u32> {
        1u32..=12
    }

    /// Strategy for generating place names absent from the catalogue
    fn unlisted_location_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z]{3,12}".prop_map(|name| format!("Unlisted {}", name))
    }

    /// Strategy for picking a zone id from the built-in catalogue
    fn zone_id_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("temperate-continental"),
            Just("tropical-wet"),
            Just("mediterranean"),
            Just("desert-hot"),
            Just("polar-tundra"),
            Just("monsoon"),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The southern shift stays inside 1..=12 and is its own inverse
        #[test]
        fn prop_southern_shift_is_an_involution(month in month_strategy()) {
            let shifted = adjusted_month(month, Hemisphere::Southern);
            prop_assert!((1..=12).contains(&shifted));
            prop_assert_ne!(shifted, month);
            prop_assert_eq!(adjusted_month(shifted, Hemisphere::Southern), month);
            prop_assert_eq!(adjusted_month(month, Hemisphere::Northern), month);
        }

        /// Southern month m resolves to the same season as northern month m+6
        #[test]
        fn prop_southern_inversion(zone_id in zone_id_strategy(), month in month_strategy()) {
            let catalog = catalog();
            let zone = catalog.lookup_zone(zone_id).unwrap();
            let opposite = (month + 5) % 12 + 1;

            prop_assert_eq!(
                resolve_season_for_month(SeasonTable::Zone(zone), Hemisphere::Southern, month),
                resolve_season_for_month(SeasonTable::Zone(zone), Hemisphere::Northern, opposite)
            );
        }

        /// Every built-in zone covers every month
        #[test]
        fn prop_zone_tables_cover_every_month(zone_id in zone_id_strategy(), month in month_strategy()) {
            let catalog = catalog();
            let zone = catalog.lookup_zone(zone_id).unwrap();
            let season = resolve_season_for_month(SeasonTable::Zone(zone), Hemisphere::Northern, month);
            prop_assert!(season.is_some());
            prop_assert!(zone.seasons.contains_key(season.as_deref().unwrap()));
        }

        /// Unknown places keep their name and land in the default zone
        #[test]
        fn prop_unknown_location_fallback(name in unlisted_location_strategy(), month in month_strategy()) {
            let context = catalog().lookup_climate(&name, in_month(month));

            prop_assert_eq!(&context.climate_data.location, &name);
            prop_assert_eq!(context.zone_id(), Some(DEFAULT_ZONE_ID));
            prop_assert_eq!(
                context.current_season,
                resolve_season_for_month(SeasonTable::Default, Hemisphere::Northern, month)
            );
        }

        /// Location attributes only ever add widgets, duplicates included
        #[test]
        fn prop_location_accretion_is_additive(
            coastal in any::<bool>(),
            urban in any::<bool>(),
            elevation in prop::option::of(0i32..3000),
        ) {
            let catalog = catalog();
            let zone = catalog.lookup_zone("tropical-wet").unwrap();
            let mut plain = catalog.lookup_location("Singapore");
            plain.coastal_influence = false;
            plain.urban_heat_island = false;
            plain.elevation = None;

            let mut data = plain.clone();
            data.coastal_influence = coastal;
            data.urban_heat_island = urban;
            data.elevation = elevation;

            let base = recommend(zone, "wet-season", &plain).unwrap();
            let recs = recommend(zone, "wet-season", &data).unwrap();

            let extra = [coastal, urban, data.is_high_altitude()]
                .iter()
                .filter(|flag| **flag)
                .count();
            prop_assert_eq!(recs.widgets.len(), base.widgets.len() + 2 * extra);
            prop_assert_eq!(&recs.widgets[..base.widgets.len()], &base.widgets[..]);

            let air_quality = recs
                .widgets
                .iter()
                .filter(|kind| **kind == WidgetKind::AirQuality)
                .count();
            prop_assert_eq!(air_quality, if urban { 2 } else { 1 });
        }

        /// Recommendations exist for every resolved season of a catalogued location
        #[test]
        fn prop_resolved_season_has_recommendations(index in 0usize..20, month in month_strategy()) {
            let catalog = catalog();
            let location = &catalog.locations()[index];
            let context = catalog.lookup_climate(&location.location, in_month(month));
            let zone = context.climate_zone.as_ref().unwrap();
            let season = context.current_season.as_deref().unwrap();

            let recs = recommend(zone, season, &context.climate_data);
            prop_assert!(recs.is_some());
        }
    }
}
