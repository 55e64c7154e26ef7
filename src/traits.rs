//! Provider traits for the external services.
//!
//! Every HTTP adapter implements one of these, and the evaluation logic only
//! ever talks to the traits, so tests can swap in in-memory providers.

use crate::error::{Error, Result};
use crate::models::{
    Bounds, CandidateRoute, GeoPoint, HourlyAirQuality, Place, QueryWindow, Station,
    StationPollutants,
};

/// Resolves place names to coordinates.
pub trait Geocoder {
    /// Up to `limit` places matching `query`, best match first.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>>;

    /// First match for `query`, or [`Error::LookupFailure`].
    fn locate(&self, query: &str) -> Result<GeoPoint> {
        self.search(query, 1)?
            .into_iter()
            .next()
            .map(|place| place.point)
            .ok_or_else(|| Error::LookupFailure(query.to_string()))
    }
}

/// Provides driving routes between two points.
pub trait RouteProvider {
    /// The reference route first, followed by up to `alternatives` others.
    fn routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        alternatives: usize,
    ) -> Result<Vec<CandidateRoute>>;
}

/// Provides hourly pollutant concentrations for a point.
///
/// Called from parallel iterators, hence `Sync`.
pub trait AirQualityProvider: Sync {
    fn hourly(&self, point: GeoPoint, window: QueryWindow) -> Result<HourlyAirQuality>;
}

/// Lists monitoring stations and their live readings.
pub trait StationDirectory: Sync {
    fn stations_in(&self, bounds: Bounds) -> Result<Vec<Station>>;

    fn station_pollutants(&self, uid: i64) -> Result<StationPollutants>;
}
