//! Service configuration from environment.

use std::env;

use crate::nominatim::NominatimConfig;
use crate::open_meteo::AirQualityConfig;
use crate::osrm::OsrmConfig;
use crate::waqi::WaqiConfig;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub osrm: OsrmConfig,
    pub air_quality: AirQualityConfig,
    pub nominatim: NominatimConfig,
    pub waqi: WaqiConfig,
}

impl Config {
    /// Defaults overridden by `OSRM_URL`, `OSRM_PROFILE`, `AIR_QUALITY_URL`,
    /// `NOMINATIM_URL`, `NOMINATIM_USER_AGENT`, `WAQI_URL`, `WAQI_TOKEN` and
    /// `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = var("OSRM_URL") {
            config.osrm.base_url = url;
        }
        if let Some(profile) = var("OSRM_PROFILE") {
            config.osrm.profile = profile;
        }
        if let Some(url) = var("AIR_QUALITY_URL") {
            config.air_quality.base_url = url;
        }
        if let Some(url) = var("NOMINATIM_URL") {
            config.nominatim.base_url = url;
        }
        if let Some(agent) = var("NOMINATIM_USER_AGENT") {
            config.nominatim.user_agent = agent;
        }
        if let Some(url) = var("WAQI_URL") {
            config.waqi.base_url = url;
        }
        if let Some(token) = var("WAQI_TOKEN") {
            config.waqi.token = token;
        }
        if let Some(value) = var("HTTP_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(0) => tracing::warn!("ignoring zero HTTP_TIMEOUT_SECS"),
                Ok(timeout) => {
                    config.osrm.timeout_secs = timeout;
                    config.air_quality.timeout_secs = timeout;
                    config.nominatim.timeout_secs = timeout;
                    config.waqi.timeout_secs = timeout;
                }
                Err(err) => tracing::warn!(%value, %err, "ignoring unparsable HTTP_TIMEOUT_SECS"),
            }
        }
        config
    }
}
