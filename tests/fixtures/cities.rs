//! City centre coordinates used as route endpoints in tests.
//!
//! Coordinates sourced from OpenStreetMap via Nominatim.

use clean_route::GeoPoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

pub const DELHI: Location = Location::new("New Delhi", 28.6138954, 77.2090057);
pub const AGRA: Location = Location::new("Agra", 27.1752554, 78.0098161);
pub const JAIPUR: Location = Location::new("Jaipur", 26.9154576, 75.8189817);
pub const MUMBAI: Location = Location::new("Mumbai", 19.0785451, 72.878176);
pub const PUNE: Location = Location::new("Pune", 18.5213738, 73.8545071);
