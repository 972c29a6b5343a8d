//! Favourite location model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved location shown in the favourites bar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLocation {
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
}
