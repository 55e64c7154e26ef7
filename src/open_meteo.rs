//! Open-Meteo air-quality adapter.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::{self, DEFAULT_USER_AGENT};
use crate::models::{GeoPoint, HourlyAirQuality, QueryWindow};
use crate::traits::AirQualityProvider;

const SERVICE: &str = "open-meteo";

const HOURLY_VARIABLES: &str =
    "pm10,pm2_5,carbon_monoxide,ozone,sulphur_dioxide,nitrogen_dioxide";

#[derive(Debug, Clone)]
pub struct AirQualityConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://air-quality-api.open-meteo.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AirQualityClient {
    config: AirQualityConfig,
    client: reqwest::blocking::Client,
}

impl AirQualityClient {
    pub fn new(config: AirQualityConfig) -> Result<Self> {
        let client = http::build_client(SERVICE, config.timeout_secs, DEFAULT_USER_AGENT)?;
        Ok(Self { config, client })
    }
}

fn query_params(point: GeoPoint, window: QueryWindow) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("latitude", point.lat.to_string()),
        ("longitude", point.lng.to_string()),
        ("hourly", HOURLY_VARIABLES.to_string()),
    ];
    if let QueryWindow::Range { start, end } = window {
        params.push(("start_date", start.format("%Y-%m-%d").to_string()));
        params.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }
    params
}

impl AirQualityProvider for AirQualityClient {
    fn hourly(&self, point: GeoPoint, window: QueryWindow) -> Result<HourlyAirQuality> {
        let url = format!(
            "{}/v1/air-quality",
            self.config.base_url.trim_end_matches('/')
        );
        let request = self.client.get(url).query(&query_params(point, window));
        tracing::debug!(?point, ?window, "requesting air quality");

        let body: AirQualityResponse = http::get_json(SERVICE, request)?;
        body.into_hourly()
    }
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
    hourly: Option<HourlyAirQuality>,
}

impl AirQualityResponse {
    fn into_hourly(self) -> Result<HourlyAirQuality> {
        if self.error {
            return Err(Error::Api {
                service: SERVICE,
                message: self.reason.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        self.hourly.ok_or_else(|| Error::Api {
            service: SERVICE,
            message: "response carried no hourly data".to_string(),
        })
    }
}
