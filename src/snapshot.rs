//! Current air quality and 24-hour trend for a single location.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::aqi::Band;
use crate::error::Result;
use crate::models::{GeoPoint, HourlyAirQuality, QueryWindow};
use crate::traits::AirQualityProvider;

/// Hours covered by the trend.
pub const TREND_HOURS: usize = 24;

/// First-hour value of each pollutant (µg/m³).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollutantLevels {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub ozone: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Hour of day, e.g. "13:00".
    pub label: String,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualitySnapshot {
    pub point: GeoPoint,
    pub current: PollutantLevels,
    pub pm2_5_band: Option<Band>,
    pub pm10_band: Option<Band>,
    pub trend: Vec<TrendPoint>,
}

pub fn snapshot<A>(air: &A, point: GeoPoint) -> Result<AirQualitySnapshot>
where
    A: AirQualityProvider + ?Sized,
{
    let hourly = air.hourly(point, QueryWindow::Forecast)?;
    Ok(build_snapshot(point, &hourly))
}

fn first(series: &[Option<f64>]) -> Option<f64> {
    series.first().copied().flatten()
}

fn build_snapshot(point: GeoPoint, hourly: &HourlyAirQuality) -> AirQualitySnapshot {
    let current = PollutantLevels {
        pm2_5: first(&hourly.pm2_5),
        pm10: first(&hourly.pm10),
        carbon_monoxide: first(&hourly.carbon_monoxide),
        ozone: first(&hourly.ozone),
        sulphur_dioxide: first(&hourly.sulphur_dioxide),
        nitrogen_dioxide: first(&hourly.nitrogen_dioxide),
    };

    let trend = hourly
        .time
        .iter()
        .take(TREND_HOURS)
        .enumerate()
        .map(|(hour, time)| TrendPoint {
            label: hour_label(time),
            pm2_5: hourly.pm2_5.get(hour).copied().flatten(),
            pm10: hourly.pm10.get(hour).copied().flatten(),
        })
        .collect();

    AirQualitySnapshot {
        point,
        pm2_5_band: current.pm2_5.and_then(Band::for_pm25),
        pm10_band: current.pm10.and_then(Band::for_pm10),
        current,
        trend,
    }
}

/// "2024-11-02T13:00" becomes "13:00"; unparsable stamps pass through.
fn hour_label(time: &str) -> String {
    match NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M") {
        Ok(stamp) => format!("{}:00", stamp.hour()),
        Err(_) => time.to_string(),
    }
}
