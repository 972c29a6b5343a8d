//! Common types used across the dashboard

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Geographic coordinates of a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    #[serde(with = "rust_decimal::serde::float")]
    pub lat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub lon: Decimal,
}

impl Coordinates {
    pub fn new(lat: Decimal, lon: Decimal) -> Self {
        Self { lat, lon }
    }

    /// Null island, used for locations missing from the lookup table
    pub fn origin() -> Self {
        Self {
            lat: Decimal::ZERO,
            lon: Decimal::ZERO,
        }
    }
}

/// Hemisphere a location sits in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    Northern,
    Southern,
}

impl std::fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hemisphere::Northern => write!(f, "northern"),
            Hemisphere::Southern => write!(f, "southern"),
        }
    }
}

/// Layout footprint of a widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Advisory grid placement; not enforced unique
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Widget colour theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
    Seasonal,
}

/// Measurement system used when displaying values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}
