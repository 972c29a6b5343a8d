//! Season resolution
//!
//! One resolver serves both the zone-specific season tables and the fixed four-season
//! table used for locations missing from the catalogue. Southern-hemisphere dates are
//! shifted six months before the lookup because season tables are written in northern
//! reckoning.

use chrono::{DateTime, Datelike, Utc};

use crate::models::{ClimateZone, Season};
use crate::types::Hemisphere;

/// Fixed northern four-season calendar
const DEFAULT_SEASONS: [(Season, [u32; 3]); 4] = [
    (Season::Spring, [3, 4, 5]),
    (Season::Summer, [6, 7, 8]),
    (Season::Autumn, [9, 10, 11]),
    (Season::Winter, [12, 1, 2]),
];

/// Which season table the resolver consults
#[derive(Debug, Clone, Copy)]
pub enum SeasonTable<'a> {
    Zone(&'a ClimateZone),
    Default,
}

/// Month as seen by a northern-hemisphere season table
pub fn adjusted_month(month: u32, hemisphere: Hemisphere) -> u32 {
    match hemisphere {
        Hemisphere::Northern => month,
        Hemisphere::Southern => {
            let adjusted = month + 6;
            if adjusted > 12 {
                adjusted - 12
            } else {
                adjusted
            }
        }
    }
}

/// Season key for `month` (1-12) in the given table, or `None` when no season covers it
pub fn resolve_season_for_month(
    table: SeasonTable<'_>,
    hemisphere: Hemisphere,
    month: u32,
) -> Option<String> {
    let month = adjusted_month(month, hemisphere);
    match table {
        SeasonTable::Zone(zone) => zone
            .seasons
            .iter()
            .find(|(_, profile)| profile.contains_month(month))
            .map(|(key, _)| key.clone()),
        SeasonTable::Default => DEFAULT_SEASONS
            .iter()
            .find(|(_, months)| months.contains(&month))
            .map(|(season, _)| season.key().to_string()),
    }
}

/// Season key active at `now`
pub fn resolve_season(
    table: SeasonTable<'_>,
    hemisphere: Hemisphere,
    now: DateTime<Utc>,
) -> Option<String> {
    resolve_season_for_month(table, hemisphere, now.month())
}

/// Calendar season from the default table, used for the "current" template filter
pub fn current_default_season(now: DateTime<Utc>) -> Season {
    resolve_season(SeasonTable::Default, Hemisphere::Northern, now)
        .and_then(|key| Season::from_key(&key))
        .unwrap_or(Season::Winter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PrecipitationLevel, SeasonProfile, SeasonalPattern, TemperatureRange};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn zone(seasons: &[(&str, &[u32])]) -> ClimateZone {
        let seasons = seasons
            .iter()
            .map(|(key, months)| {
                (
                    key.to_string(),
                    SeasonProfile {
                        months: months.to_vec(),
                        temperature: TemperatureRange { min: 0, max: 10 },
                        precipitation: PrecipitationLevel::Moderate,
                        characteristics: vec![],
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        ClimateZone {
            id: "test-zone".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            characteristics: vec![],
            seasonal_pattern: SeasonalPattern::Traditional,
            seasons,
        }
    }

    fn date(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_adjusted_month_wraps() {
        assert_eq!(adjusted_month(1, Hemisphere::Southern), 7);
        assert_eq!(adjusted_month(6, Hemisphere::Southern), 12);
        assert_eq!(adjusted_month(7, Hemisphere::Southern), 1);
        assert_eq!(adjusted_month(12, Hemisphere::Southern), 6);
        assert_eq!(adjusted_month(12, Hemisphere::Northern), 12);
    }

    #[test]
    fn test_zone_table_lookup() {
        let zone = zone(&[("wet", &[5, 6, 7, 8, 9, 10]), ("dry", &[11, 12, 1, 2, 3, 4])]);
        let table = SeasonTable::Zone(&zone);
        assert_eq!(resolve_season(table, Hemisphere::Northern, date(7)).as_deref(), Some("wet"));
        assert_eq!(resolve_season(table, Hemisphere::Northern, date(1)).as_deref(), Some("dry"));
        // January south reads as July
        assert_eq!(resolve_season(table, Hemisphere::Southern, date(1)).as_deref(), Some("wet"));
    }

    #[test]
    fn test_uncovered_month_yields_none() {
        let zone = zone(&[("only", &[1, 2])]);
        assert_eq!(resolve_season(SeasonTable::Zone(&zone), Hemisphere::Northern, date(5)), None);
    }

    #[test]
    fn test_default_table_respects_hemisphere() {
        assert_eq!(
            resolve_season(SeasonTable::Default, Hemisphere::Northern, date(4)).as_deref(),
            Some("spring")
        );
        assert_eq!(
            resolve_season(SeasonTable::Default, Hemisphere::Southern, date(4)).as_deref(),
            Some("autumn")
        );
    }

    #[test]
    fn test_current_default_season() {
        assert_eq!(current_default_season(date(2)), Season::Winter);
        assert_eq!(current_default_season(date(10)), Season::Autumn);
    }

    #[test]
    fn test_current_default_season_agrees_with_resolver() {
        for month in 1..=12 {
            let key = resolve_season(SeasonTable::Default, Hemisphere::Northern, date(month));
            assert_eq!(
                Some(current_default_season(date(month)).key()),
                key.as_deref()
            );
        }
    }
}
