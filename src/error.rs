//! Error type shared by the service adapters and the evaluation logic.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Geocoding or autocomplete produced no match.
    #[error("no place found for {0:?}")]
    LookupFailure(String),
    #[error("routing service returned no route")]
    NoRouteFound,
    /// Every sampled point on every candidate route failed.
    #[error("no valid air-quality reading on any route")]
    NoValidReadings,
    #[error("{service} responded with status {status}")]
    ServiceUnavailable { service: &'static str, status: u16 },
    /// The service answered, but with an error document instead of data.
    #[error("{service} reported an error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("data only available from {min} to {max}, got {year}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("no PM2.5 data available for {0}")]
    NoData(String),
}

impl Error {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Error::Http { service, source }
    }
}
