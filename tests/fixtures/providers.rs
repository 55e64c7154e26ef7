//! In-memory providers.
//!
//! Routes built with [`grid_route`] place their seven vertices at
//! `(lat = route id, lng = vertex index)`, so [`GridAir`] can answer every
//! sample point from a per-route table.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Datelike;

use clean_route::models::{
    Bounds, CandidateRoute, GeoPoint, HourlyAirQuality, QueryWindow, Station, StationPollutants,
};
use clean_route::polyline::Polyline;
use clean_route::traits::{AirQualityProvider, RouteProvider, StationDirectory};
use clean_route::{Error, Result};

/// PM2.5 concentrations that land in categories 1 to 5.
pub const PM_CATEGORY: [f64; 6] = [0.0, 10.0, 20.0, 40.0, 100.0, 500.0];

pub fn grid_route(id: usize, length_km: f64) -> CandidateRoute {
    CandidateRoute {
        path: Polyline::new((0..7).map(|k| GeoPoint::new(id as f64, k as f64)).collect()),
        length_meters: length_km * 1000.0,
        duration_seconds: length_km * 60.0,
    }
}

/// Returns a fixed list of routes and records what was asked.
pub struct FixedRouter {
    pub routes: Vec<CandidateRoute>,
    pub requested_alternatives: Mutex<Option<usize>>,
}

impl FixedRouter {
    pub fn new(routes: Vec<CandidateRoute>) -> Self {
        Self {
            routes,
            requested_alternatives: Mutex::new(None),
        }
    }
}

impl RouteProvider for FixedRouter {
    fn routes(&self, _start: GeoPoint, _end: GeoPoint, alternatives: usize) -> Result<Vec<CandidateRoute>> {
        *self.requested_alternatives.lock().expect("lock") = Some(alternatives);
        Ok(self.routes.clone())
    }
}

/// Fails every request with an error document, as a misconfigured
/// routing backend would.
pub struct FailingRouter;

impl RouteProvider for FailingRouter {
    fn routes(&self, _start: GeoPoint, _end: GeoPoint, _alternatives: usize) -> Result<Vec<CandidateRoute>> {
        Err(Error::Api {
            service: "osrm",
            message: "Invalid profile".to_string(),
        })
    }
}

/// Answers sample points of [`grid_route`]s from `categories[route][vertex]`.
/// A `None` entry fails the request.
pub struct GridAir {
    pub categories: Vec<Vec<Option<u8>>>,
    pub calls: AtomicUsize,
}

impl GridAir {
    pub fn new(categories: Vec<Vec<Option<u8>>>) -> Self {
        Self {
            categories,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every vertex of every route reports `category`.
    pub fn uniform(routes: &[u8]) -> Self {
        Self::new(routes.iter().map(|c| vec![Some(*c); 7]).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AirQualityProvider for GridAir {
    fn hourly(&self, point: GeoPoint, _window: QueryWindow) -> Result<HourlyAirQuality> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let category = self
            .categories
            .get(point.lat as usize)
            .and_then(|route| route.get(point.lng as usize))
            .copied()
            .flatten();
        match category {
            Some(category) => Ok(HourlyAirQuality {
                time: vec!["2024-11-02T00:00".to_string()],
                pm2_5: vec![Some(PM_CATEGORY[category as usize])],
                ..Default::default()
            }),
            None => Err(Error::ServiceUnavailable {
                service: "open-meteo",
                status: 503,
            }),
        }
    }
}

/// Serves one PM2.5 series per requested year.
pub struct YearlyAir {
    pub series: HashMap<i32, Vec<Option<f64>>>,
    pub windows: Mutex<Vec<QueryWindow>>,
}

impl YearlyAir {
    pub fn new(series: impl IntoIterator<Item = (i32, Vec<Option<f64>>)>) -> Self {
        Self {
            series: series.into_iter().collect(),
            windows: Mutex::new(Vec::new()),
        }
    }
}

impl AirQualityProvider for YearlyAir {
    fn hourly(&self, _point: GeoPoint, window: QueryWindow) -> Result<HourlyAirQuality> {
        self.windows.lock().expect("lock").push(window);
        let QueryWindow::Range { start, .. } = window else {
            return Err(Error::Api {
                service: "open-meteo",
                message: "expected a date range".to_string(),
            });
        };
        let pm2_5 = self.series.get(&start.year()).cloned().unwrap_or_default();
        Ok(HourlyAirQuality {
            pm2_5,
            ..Default::default()
        })
    }
}

/// Station directory backed by a list; uids in `broken` fail their detail.
pub struct FixedDirectory {
    pub stations: Vec<Station>,
    pub broken: Vec<i64>,
}

impl StationDirectory for FixedDirectory {
    fn stations_in(&self, _bounds: Bounds) -> Result<Vec<Station>> {
        Ok(self.stations.clone())
    }

    fn station_pollutants(&self, uid: i64) -> Result<StationPollutants> {
        if self.broken.contains(&uid) {
            return Err(Error::Api {
                service: "waqi",
                message: "Unknown station".to_string(),
            });
        }
        Ok(StationPollutants {
            pm25: Some(uid as f64),
            pm10: None,
            no2: Some(1.0),
        })
    }
}

pub struct OfflineDirectory;

impl StationDirectory for OfflineDirectory {
    fn stations_in(&self, _bounds: Bounds) -> Result<Vec<Station>> {
        Err(Error::Api {
            service: "waqi",
            message: "Invalid key".to_string(),
        })
    }

    fn station_pollutants(&self, _uid: i64) -> Result<StationPollutants> {
        unreachable!("no stations are ever listed")
    }
}
