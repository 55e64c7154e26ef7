//! Nominatim geocoding and place suggestions.

use serde::Deserialize;

use crate::error::Result;
use crate::http::{self, DEFAULT_USER_AGENT};
use crate::models::{GeoPoint, Place};
use crate::traits::Geocoder;

const SERVICE: &str = "nominatim";

/// Queries shorter than this get no suggestions.
pub const MIN_SUGGEST_CHARS: usize = 2;
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = http::build_client(SERVICE, config.timeout_secs, &config.user_agent)?;
        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let request = self.client.get(url).query(&[
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", limit.to_string()),
            ("addressdetails", "1".to_string()),
        ]);
        tracing::debug!(query, limit, "geocoding");

        let body: Vec<NominatimPlace> = http::get_json(SERVICE, request)?;
        Ok(body.into_iter().filter_map(NominatimPlace::into_place).collect())
    }
}

/// Autocomplete: up to five places for a partially typed name.
pub fn suggest<G: Geocoder + ?Sized>(geocoder: &G, query: &str) -> Result<Vec<Place>> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGEST_CHARS {
        return Ok(Vec::new());
    }
    geocoder.search(query, SUGGESTION_LIMIT)
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: u64,
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country: Option<String>,
}

impl NominatimPlace {
    fn into_place(self) -> Option<Place> {
        let (Ok(lat), Ok(lng)) = (self.lat.parse::<f64>(), self.lon.parse::<f64>()) else {
            tracing::warn!(place_id = self.place_id, "skipping place with unparsable coordinates");
            return None;
        };
        Some(Place {
            id: self.place_id,
            name: self.display_name,
            country: self
                .address
                .and_then(|address| address.country)
                .unwrap_or_default(),
            point: GeoPoint::new(lat, lng),
        })
    }
}
