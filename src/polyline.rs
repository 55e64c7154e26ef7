//! Polyline representation for route geometries.
//!
//! Routes arrive from OSRM as GeoJSON `[lng, lat]` pairs and are stored here
//! as decoded [`GeoPoint`]s. The polyline also knows where along itself the
//! air-quality samples are taken.

use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

/// Fractional vertex positions sampled along a route. The last vertex is
/// always sampled in addition to these.
pub const SAMPLE_FRACTIONS: [f64; 6] = [0.0, 0.16, 0.33, 0.5, 0.66, 0.83];

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Builds a polyline from GeoJSON-ordered `[lng, lat]` pairs.
    pub fn from_lng_lat(coordinates: &[[f64; 2]]) -> Self {
        Self {
            points: coordinates
                .iter()
                .map(|[lng, lat]| GeoPoint::new(*lat, *lng))
                .collect(),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertices at `floor(len * f)` for each of [`SAMPLE_FRACTIONS`], then
    /// the final vertex. Short paths repeat vertices; an empty path yields
    /// no samples.
    pub fn sample_points(&self) -> Vec<GeoPoint> {
        let Some(last) = self.points.last() else {
            return Vec::new();
        };
        let len = self.points.len();
        let mut samples: Vec<GeoPoint> = SAMPLE_FRACTIONS
            .iter()
            .map(|fraction| {
                let index = ((len as f64) * fraction).floor() as usize;
                self.points[index.min(len - 1)]
            })
            .collect();
        samples.push(*last);
        samples
    }
}
