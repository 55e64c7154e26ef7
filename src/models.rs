//! Value types shared by the providers and the evaluation logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A drivable route returned by a [`RouteProvider`](crate::traits::RouteProvider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub path: Polyline,
    pub length_meters: f64,
    pub duration_seconds: f64,
}

impl CandidateRoute {
    pub fn distance_km(&self) -> f64 {
        round_2(self.length_meters / 1000.0)
    }
}

/// A geocoder match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub point: GeoPoint,
}

/// Which slice of time an air-quality query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryWindow {
    /// The service's default window; the first hour is the current day.
    Forecast,
    /// Inclusive calendar date range.
    Range { start: NaiveDate, end: NaiveDate },
}

/// Hourly pollutant series. Gaps in the service data are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyAirQuality {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub pm10: Vec<Option<f64>>,
    #[serde(default)]
    pub pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    pub carbon_monoxide: Vec<Option<f64>>,
    #[serde(default)]
    pub ozone: Vec<Option<f64>>,
    #[serde(default)]
    pub sulphur_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    pub nitrogen_dioxide: Vec<Option<f64>>,
}

impl HourlyAirQuality {
    /// PM2.5 for the first hour of the window, if present.
    pub fn first_pm2_5(&self) -> Option<f64> {
        self.pm2_5.first().copied().flatten()
    }

    /// Mean of every non-null PM2.5 value in the window.
    pub fn mean_pm2_5(&self) -> Option<f64> {
        let values: Vec<f64> = self.pm2_5.iter().flatten().copied().collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Indian subcontinent, the default heat map extent.
    pub const INDIA: Bounds = Bounds {
        south: 8.4,
        west: 68.7,
        north: 37.6,
        east: 97.25,
    };
}

/// A monitoring station as listed by a [`StationDirectory`](crate::traits::StationDirectory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub uid: i64,
    pub point: GeoPoint,
    /// Live AQI on the 0–500 scale; `None` when the station reports nothing.
    pub aqi: Option<u32>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationPollutants {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
}

pub(crate) fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
