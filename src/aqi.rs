//! Concentration and index scales.
//!
//! Two scales are in use: the coarse 1–5 [`AqiCategory`] that routes and
//! yearly averages are scored on, and the six-level [`Band`] used when
//! describing a single reading or a station.

use serde::{Deserialize, Serialize};

/// Coarse PM2.5 category, 1 (Good) to 5 (Hazardous).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    Good = 1,
    Moderate = 2,
    UnhealthyForSensitiveGroups = 3,
    Unhealthy = 4,
    Hazardous = 5,
}

impl AqiCategory {
    /// Maps a PM2.5 concentration (µg/m³) onto the 1–5 scale.
    pub fn from_pm25(concentration: f64) -> Self {
        if concentration <= 12.0 {
            AqiCategory::Good
        } else if concentration <= 35.4 {
            AqiCategory::Moderate
        } else if concentration <= 55.4 {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if concentration <= 150.4 {
            AqiCategory::Unhealthy
        } else {
            AqiCategory::Hazardous
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

/// Six-level descriptive band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

const PM25_UPPER: [f64; 5] = [12.0, 35.4, 55.4, 150.4, 250.4];
const PM10_UPPER: [f64; 5] = [54.0, 154.0, 254.0, 354.0, 424.0];
const STATION_AQI_UPPER: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 300.0];

impl Band {
    const ORDER: [Band; 6] = [
        Band::Good,
        Band::Moderate,
        Band::UnhealthyForSensitiveGroups,
        Band::Unhealthy,
        Band::VeryUnhealthy,
        Band::Hazardous,
    ];

    fn from_upper_bounds(value: f64, upper: &[f64; 5]) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let index = upper
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(upper.len());
        Some(Self::ORDER[index])
    }

    pub fn for_pm25(concentration: f64) -> Option<Self> {
        Self::from_upper_bounds(concentration, &PM25_UPPER)
    }

    pub fn for_pm10(concentration: f64) -> Option<Self> {
        Self::from_upper_bounds(concentration, &PM10_UPPER)
    }

    /// Band for a station index on the 0–500 AQI scale.
    pub fn for_station_aqi(aqi: u32) -> Self {
        Self::from_upper_bounds(f64::from(aqi), &STATION_AQI_UPPER).unwrap_or(Band::Hazardous)
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Good => "Good",
            Band::Moderate => "Moderate",
            Band::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Band::Unhealthy => "Unhealthy",
            Band::VeryUnhealthy => "Very Unhealthy",
            Band::Hazardous => "Hazardous",
        }
    }

    /// Map marker colour.
    pub fn hex_color(self) -> &'static str {
        match self {
            Band::Good => "#00e400",
            Band::Moderate => "#ffff00",
            Band::UnhealthyForSensitiveGroups => "#ff7e00",
            Band::Unhealthy => "#ff0000",
            Band::VeryUnhealthy => "#99004c",
            Band::Hazardous => "#7e0023",
        }
    }
}
