//! clean-route core
//!
//! Air-quality lookups and cleanest-route selection on top of public
//! routing, geocoding and air-quality services.

pub mod aqi;
pub mod comparison;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod haversine;
pub mod heatmap;
pub mod http;
pub mod models;
pub mod nominatim;
pub mod open_meteo;
pub mod osrm;
pub mod polyline;
pub mod snapshot;
pub mod traits;
pub mod waqi;

pub use error::{Error, Result};
pub use models::GeoPoint;
