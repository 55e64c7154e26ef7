//! Cleanest-route selection.
//!
//! Candidate routes are scored by the mean PM2.5 category sampled along
//! their path, then scanned greedily against the reference route.

use rayon::prelude::*;
use serde::Serialize;

use crate::aqi::AqiCategory;
use crate::error::{Error, Result};
use crate::models::{CandidateRoute, GeoPoint, QueryWindow, round_2};
use crate::traits::{AirQualityProvider, RouteProvider};

#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// An alternative must score below `best * improvement_factor`.
    pub improvement_factor: f64,
    /// Largest accepted length increase over the reference, as a fraction.
    pub max_distance_increase: f64,
    /// Alternatives requested in addition to the reference route.
    pub max_alternatives: usize,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            improvement_factor: 0.95,
            max_distance_increase: 0.30,
            max_alternatives: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleReading {
    pub point: GeoPoint,
    /// `None` when the request failed or the service had no value.
    pub category: Option<AqiCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteScore {
    pub index: usize,
    pub length_meters: f64,
    pub average_aqi: Option<f64>,
    /// Length increase over the reference route (0.25 = 25 % longer).
    pub distance_increase: f64,
}

/// Per-route diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReport {
    pub index: usize,
    pub distance_km: f64,
    pub average_aqi: Option<f64>,
    pub distance_increase: f64,
    /// Relative improvement over the baseline this route was compared with.
    pub aqi_improvement: Option<f64>,
    pub samples: Vec<SampleReading>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanestRoute {
    pub route: CandidateRoute,
    pub route_index: usize,
    pub average_aqi: f64,
    pub distance_km: f64,
    pub distance_increase: f64,
    pub reference_distance_km: f64,
    pub reference_average_aqi: Option<f64>,
    pub reports: Vec<RouteReport>,
}

impl CleanestRoute {
    /// Relative air-quality gain of the selection over the reference route.
    pub fn aqi_improvement(&self) -> Option<f64> {
        self.reference_average_aqi
            .map(|reference| (reference - self.average_aqi) / reference)
    }
}

/// Picks the route between `start` and `end` with the cleanest air that is
/// not unreasonably longer than the reference route.
pub fn select_cleanest_route<R, A>(
    router: &R,
    air: &A,
    start: GeoPoint,
    end: GeoPoint,
    options: &EvaluateOptions,
) -> Result<CleanestRoute>
where
    R: RouteProvider + ?Sized,
    A: AirQualityProvider + ?Sized,
{
    let mut routes = router.routes(start, end, options.max_alternatives)?;
    routes.truncate(options.max_alternatives + 1);
    if routes.is_empty() {
        return Err(Error::NoRouteFound);
    }
    if routes.len() == 1 {
        tracing::info!("only one route found; no alternatives to compare");
    }

    let reference_length = routes[0].length_meters;
    let mut scores = Vec::with_capacity(routes.len());
    let mut reports = Vec::with_capacity(routes.len());

    // Routes are sampled one after another; the samples of one route are
    // fetched in parallel.
    for (index, route) in routes.iter().enumerate() {
        let samples = sample_route(air, route);
        let score = RouteScore {
            index,
            length_meters: route.length_meters,
            average_aqi: average_category(&samples),
            distance_increase: distance_increase(route.length_meters, reference_length),
        };
        tracing::info!(
            index,
            distance_km = route.distance_km(),
            average_aqi = ?score.average_aqi,
            distance_increase = score.distance_increase,
            "scored route"
        );
        reports.push(RouteReport {
            index,
            distance_km: route.distance_km(),
            average_aqi: score.average_aqi,
            distance_increase: score.distance_increase,
            aqi_improvement: None,
            samples,
            selected: false,
        });
        scores.push(score);
    }

    let scan = scan_routes(&scores, options);
    for (report, baseline) in reports.iter_mut().zip(&scan.baselines) {
        report.aqi_improvement = match (report.average_aqi, *baseline) {
            (Some(average), Some(baseline)) => Some((baseline - average) / baseline),
            _ => None,
        };
    }

    let Some(selected) = scan.selected else {
        tracing::warn!(routes = routes.len(), "no route yielded a usable score");
        return Err(Error::NoValidReadings);
    };
    reports[selected].selected = true;

    let score = scores[selected];
    let average_aqi = score.average_aqi.ok_or(Error::NoValidReadings)?;
    let reference_average_aqi = scores[0].average_aqi;
    let route = routes.swap_remove(selected);
    tracing::info!(index = selected, average_aqi, "selected route");

    Ok(CleanestRoute {
        distance_km: route.distance_km(),
        route,
        route_index: selected,
        average_aqi,
        distance_increase: score.distance_increase,
        reference_distance_km: round_2(reference_length / 1000.0),
        reference_average_aqi,
        reports,
    })
}

/// Fetches the current PM2.5 category at each sampling point of `route`.
/// All requests are issued in parallel and awaited together; failures
/// become absent readings.
pub fn sample_route<A>(air: &A, route: &CandidateRoute) -> Vec<SampleReading>
where
    A: AirQualityProvider + ?Sized,
{
    route
        .path
        .sample_points()
        .into_par_iter()
        .map(|point| SampleReading {
            point,
            category: read_category(air, point),
        })
        .collect()
}

fn read_category<A>(air: &A, point: GeoPoint) -> Option<AqiCategory>
where
    A: AirQualityProvider + ?Sized,
{
    match air.hourly(point, QueryWindow::Forecast) {
        Ok(hourly) => {
            let category = hourly.first_pm2_5().map(AqiCategory::from_pm25);
            if category.is_none() {
                tracing::warn!(?point, "no PM2.5 value at sample point");
            }
            category
        }
        Err(err) => {
            tracing::warn!(?point, error = %err, "air-quality sample failed");
            None
        }
    }
}

/// Mean of the present categories; `None` when every reading is absent.
pub fn average_category(samples: &[SampleReading]) -> Option<f64> {
    let values: Vec<f64> = samples
        .iter()
        .filter_map(|sample| sample.category)
        .map(|category| f64::from(category.value()))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn distance_increase(length_meters: f64, reference_meters: f64) -> f64 {
    (length_meters - reference_meters) / reference_meters
}

/// Index of the route to take, or `None` if no route is scoreable.
///
/// Scans alternatives in order, keeping a running best that starts at the
/// reference route (`scores[0]`). An alternative replaces the current best
/// only if it beats the *current best* by the improvement factor and stays
/// within the distance cap. An unscoreable reference counts as infinitely
/// polluted.
pub fn choose_route(scores: &[RouteScore], options: &EvaluateOptions) -> Option<usize> {
    scan_routes(scores, options).selected
}

struct Scan {
    selected: Option<usize>,
    /// Best average each route was compared against.
    baselines: Vec<Option<f64>>,
}

fn scan_routes(scores: &[RouteScore], options: &EvaluateOptions) -> Scan {
    let Some(reference) = scores.first() else {
        return Scan {
            selected: None,
            baselines: Vec::new(),
        };
    };

    let mut best: Option<(usize, f64)> = reference.average_aqi.map(|average| (reference.index, average));
    let mut baselines = vec![None];

    for score in &scores[1..] {
        baselines.push(best.map(|(_, average)| average));
        let Some(average) = score.average_aqi else {
            continue;
        };
        let threshold = best.map_or(f64::INFINITY, |(_, best_average)| {
            best_average * options.improvement_factor
        });
        if average < threshold && score.distance_increase <= options.max_distance_increase {
            tracing::debug!(index = score.index, average, "alternative replaces current best");
            best = Some((score.index, average));
        }
    }

    Scan {
        selected: best.map(|(index, _)| index),
        baselines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(index: usize, average_aqi: Option<f64>, distance_increase: f64) -> RouteScore {
        RouteScore {
            index,
            length_meters: 100_000.0 * (1.0 + distance_increase),
            average_aqi,
            distance_increase,
        }
    }

    fn reading(category: Option<AqiCategory>) -> SampleReading {
        SampleReading {
            point: GeoPoint::new(0.0, 0.0),
            category,
        }
    }

    #[test]
    fn test_average_ignores_absent_readings() {
        let samples = [
            reading(Some(AqiCategory::UnhealthyForSensitiveGroups)),
            reading(None),
            reading(Some(AqiCategory::Good)),
        ];
        assert_eq!(average_category(&samples), Some(2.0));
        assert_eq!(average_category(&[reading(None), reading(None)]), None);
    }

    #[test]
    fn test_greedy_scan_compares_against_current_best() {
        let options = EvaluateOptions::default();
        // Route 1 qualifies against the reference; route 2 beats the
        // reference by more than 5 % but not route 1, so it is rejected.
        let scores = [
            score(0, Some(4.0), 0.0),
            score(1, Some(3.0), 0.1),
            score(2, Some(2.9), 0.1),
        ];
        assert_eq!(choose_route(&scores, &options), Some(1));
    }

    #[test]
    fn test_unscoreable_reference_lets_first_alternative_in() {
        let options = EvaluateOptions::default();
        let scores = [score(0, None, 0.0), score(1, Some(4.0), 0.2), score(2, Some(3.9), 0.2)];
        assert_eq!(choose_route(&scores, &options), Some(1));
    }

    #[test]
    fn test_nothing_scoreable_selects_nothing() {
        let options = EvaluateOptions::default();
        let scores = [score(0, None, 0.0), score(1, Some(1.0), 0.5)];
        assert_eq!(choose_route(&scores, &options), None);
        assert_eq!(choose_route(&[], &options), None);
    }

    #[test]
    fn test_zero_length_reference_never_yields_to_longer_alternative() {
        assert!(distance_increase(10.0, 0.0).is_infinite());
        let options = EvaluateOptions::default();
        let scores = [score(0, Some(3.0), 0.0), score(1, Some(1.0), distance_increase(10.0, 0.0))];
        assert_eq!(choose_route(&scores, &options), Some(0));
    }
}
