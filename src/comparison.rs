//! Year-over-year PM2.5 comparison for one location.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::aqi::AqiCategory;
use crate::error::{Error, Result};
use crate::models::{GeoPoint, QueryWindow};
use crate::traits::AirQualityProvider;

/// Earliest year the air-quality archive covers.
pub const FIRST_YEAR: i32 = 2022;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub average_pm25: f64,
    pub category: AqiCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearComparison {
    pub first: YearSummary,
    pub second: YearSummary,
}

impl YearComparison {
    /// Relative PM2.5 change from the first year to the second, in percent.
    /// `None` when the first year's mean is zero.
    pub fn pm25_change_pct(&self) -> Option<f64> {
        if self.first.average_pm25 == 0.0 {
            return None;
        }
        Some((self.second.average_pm25 - self.first.average_pm25) / self.first.average_pm25 * 100.0)
    }
}

/// Mean PM2.5 over the whole calendar year `year`.
pub fn yearly_summary<A>(air: &A, point: GeoPoint, year: i32, current_year: i32) -> Result<YearSummary>
where
    A: AirQualityProvider + ?Sized,
{
    let window = year_window(year, current_year)?;
    let hourly = air.hourly(point, window)?;
    let average_pm25 = hourly
        .mean_pm2_5()
        .ok_or_else(|| Error::NoData(format!("{} at {:.4},{:.4}", year, point.lat, point.lng)))?;
    tracing::debug!(year, average_pm25, "yearly mean");

    Ok(YearSummary {
        year,
        average_pm25,
        category: AqiCategory::from_pm25(average_pm25),
    })
}

/// Fetches both years concurrently and compares them.
pub fn compare_years<A>(
    air: &A,
    point: GeoPoint,
    first_year: i32,
    second_year: i32,
    current_year: i32,
) -> Result<YearComparison>
where
    A: AirQualityProvider + ?Sized,
{
    let (first, second) = rayon::join(
        || yearly_summary(air, point, first_year, current_year),
        || yearly_summary(air, point, second_year, current_year),
    );
    Ok(YearComparison {
        first: first?,
        second: second?,
    })
}

/// [`compare_years`] against today's calendar year.
pub fn compare_years_now<A>(air: &A, point: GeoPoint, first_year: i32, second_year: i32) -> Result<YearComparison>
where
    A: AirQualityProvider + ?Sized,
{
    compare_years(air, point, first_year, second_year, Local::now().year())
}

fn year_window(year: i32, current_year: i32) -> Result<QueryWindow> {
    let out_of_range = || Error::YearOutOfRange {
        year,
        min: FIRST_YEAR,
        max: current_year,
    };
    if !(FIRST_YEAR..=current_year).contains(&year) {
        return Err(out_of_range());
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(out_of_range)?;
    Ok(QueryWindow::Range { start, end })
}
