//! Straight-line route provider (fallback when OSRM is unavailable).
//!
//! Produces a single great-circle-length route with evenly interpolated
//! vertices. Ignores roads, but never fails.

use crate::error::Result;
use crate::models::{CandidateRoute, GeoPoint};
use crate::polyline::Polyline;
use crate::traits::RouteProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

const DEFAULT_SEGMENTS: usize = 12;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone)]
pub struct StraightLineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// Number of segments the straight path is split into.
    pub segments: usize,
}

impl Default for StraightLineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl StraightLineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

impl RouteProvider for StraightLineRouter {
    fn routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        _alternatives: usize,
    ) -> Result<Vec<CandidateRoute>> {
        let segments = self.segments.max(1);
        let points = (0..=segments)
            .map(|step| {
                let t = step as f64 / segments as f64;
                GeoPoint::new(
                    start.lat + (end.lat - start.lat) * t,
                    start.lng + (end.lng - start.lng) * t,
                )
            })
            .collect();
        let km = haversine_km(start, end);

        Ok(vec![CandidateRoute {
            path: Polyline::new(points),
            length_meters: km * 1000.0,
            duration_seconds: self.km_to_seconds(km),
        }])
    }
}
