//! Seasonal recommendation models

use serde::{Deserialize, Serialize};

use super::widget::WidgetKind;

/// Suggestions for a zone and season
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Suggested widget types; may contain duplicates
    pub widgets: Vec<WidgetKind>,
    pub health_tips: Vec<String>,
    pub activities: Vec<String>,
    pub alerts: Vec<String>,
    pub clothing: Vec<String>,
}
