//! Third-party travel data ports: weather, geocoding and exchange rates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::services::travel::Coordinates;

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub country: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: u8,
    pub description: String,
    pub wind_speed_ms: f64,
}

/// A geocoded location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub display_name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, ProviderError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward lookup, best match first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, ProviderError>;

    /// Reverse lookup; `Ok(None)` when nothing is near the point.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<Place>, ProviderError>;
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`. Codes are upper-case ISO 4217.
    async fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError>;
}

/// Errors from third-party providers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider is not configured: {0}")]
    NotConfigured(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Unexpected upstream payload: {0}")]
    Decode(String),
}
