//! Reqwest-backed adapters for third-party travel data.
//!
//! Adapters own transport details only: request building, timeout and retry,
//! HTTP status mapping, JSON decoding into domain types, and response caching.

mod exchange;
mod geocode;
mod retry;
mod weather;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use tripgenius_core::ports::ProviderError;

pub use exchange::{DEFAULT_BASE_URL as EXCHANGE_RATE_DEFAULT_URL, OpenExchangeRateClient};
pub use geocode::{DEFAULT_BASE_URL as NOMINATIM_DEFAULT_URL, NominatimGeocoder};
pub use retry::{AttemptError, RetryPolicy, retry};
pub use weather::{DEFAULT_BASE_URL as OPENWEATHER_DEFAULT_URL, OpenWeatherClient};

const USER_AGENT: &str = concat!("tripgenius-backend/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with the service user agent and an overall timeout.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, ProviderError> {
    serde_json::from_slice(body)
        .map_err(|e| ProviderError::Decode(format!("invalid {what} payload: {e}")))
}
