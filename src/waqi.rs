//! World Air Quality Index station directory.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{self, DEFAULT_USER_AGENT};
use crate::models::{Bounds, GeoPoint, Station, StationPollutants};
use crate::traits::StationDirectory;

const SERVICE: &str = "waqi";

#[derive(Debug, Clone)]
pub struct WaqiConfig {
    pub base_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for WaqiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.waqi.info".to_string(),
            token: "demo".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaqiClient {
    config: WaqiConfig,
    client: reqwest::blocking::Client,
}

impl WaqiClient {
    pub fn new(config: WaqiConfig) -> Result<Self> {
        let client = http::build_client(SERVICE, config.timeout_secs, DEFAULT_USER_AGENT)?;
        Ok(Self { config, client })
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let request = self
            .client
            .get(url)
            .query(query)
            .query(&[("token", self.config.token.as_str())]);
        let envelope: WaqiEnvelope = http::get_json(SERVICE, request)?;
        envelope.into_data()
    }
}

impl StationDirectory for WaqiClient {
    fn stations_in(&self, bounds: Bounds) -> Result<Vec<Station>> {
        tracing::debug!(?bounds, "listing stations");
        let latlng = format!(
            "{},{},{},{}",
            bounds.south, bounds.west, bounds.north, bounds.east
        );
        let stations: Vec<WaqiStation> = self.fetch("/v2/map/bounds", &[("latlng", latlng)])?;
        Ok(stations.into_iter().map(WaqiStation::into_station).collect())
    }

    fn station_pollutants(&self, uid: i64) -> Result<StationPollutants> {
        let feed: WaqiFeed = self.fetch(&format!("/feed/@{}/", uid), &[])?;
        Ok(feed.into_pollutants())
    }
}

/// Every WAQI response is `{"status": "ok" | "error", "data": ...}`; on
/// error `data` is a message string.
#[derive(Debug, Deserialize)]
struct WaqiEnvelope {
    status: String,
    #[serde(default)]
    data: Value,
}

impl WaqiEnvelope {
    fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        if self.status != "ok" {
            let message = match self.data {
                Value::String(message) => message,
                other => other.to_string(),
            };
            return Err(Error::Api {
                service: SERVICE,
                message,
            });
        }
        serde_json::from_value(self.data).map_err(|err| Error::Api {
            service: SERVICE,
            message: format!("unexpected payload: {}", err),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaqiStation {
    uid: i64,
    lat: f64,
    lon: f64,
    /// A numeric string, or "-" when the station has no current reading.
    #[serde(default)]
    aqi: Value,
    station: WaqiStationInfo,
}

#[derive(Debug, Deserialize)]
struct WaqiStationInfo {
    name: String,
}

impl WaqiStation {
    fn into_station(self) -> Station {
        Station {
            uid: self.uid,
            point: GeoPoint::new(self.lat, self.lon),
            aqi: parse_aqi(&self.aqi),
            name: self.station.name,
        }
    }
}

fn parse_aqi(value: &Value) -> Option<u32> {
    let aqi = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    aqi.filter(|aqi| aqi.is_finite() && *aqi >= 0.0)
        .map(|aqi| aqi.round() as u32)
}

#[derive(Debug, Deserialize)]
struct WaqiFeed {
    #[serde(default)]
    iaqi: WaqiIaqi,
}

#[derive(Debug, Default, Deserialize)]
struct WaqiIaqi {
    pm25: Option<WaqiValue>,
    pm10: Option<WaqiValue>,
    no2: Option<WaqiValue>,
}

#[derive(Debug, Deserialize)]
struct WaqiValue {
    v: f64,
}

impl WaqiFeed {
    fn into_pollutants(self) -> StationPollutants {
        StationPollutants {
            pm25: self.iaqi.pm25.map(|value| value.v),
            pm10: self.iaqi.pm10.map(|value| value.v),
            no2: self.iaqi.no2.map(|value| value.v),
        }
    }
}
