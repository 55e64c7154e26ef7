//! Shared blocking HTTP plumbing for the service adapters.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("clean-route/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(
    service: &'static str,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent.to_string())
        .build()
        .map_err(Error::http(service))
}

/// Sends the request and decodes a JSON body, mapping non-success statuses
/// to [`Error::ServiceUnavailable`].
pub(crate) fn get_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T> {
    let response = request.send().map_err(Error::http(service))?;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(service, %status, "non-success response");
        return Err(Error::ServiceUnavailable {
            service,
            status: status.as_u16(),
        });
    }
    response.json::<T>().map_err(Error::http(service))
}
