//! OpenWeatherMap current-weather adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use tripgenius_core::ports::{Cache, ProviderError, WeatherProvider, WeatherReport, read_through};

use super::retry::{RetryPolicy, send_with_retry};
use super::{build_client, decode};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Deserialize)]
struct WeatherDto {
    name: String,
    #[serde(default)]
    sys: Option<SysDto>,
    main: MainDto,
    #[serde(default)]
    weather: Vec<ConditionDto>,
    #[serde(default)]
    wind: Option<WindDto>,
}

#[derive(Debug, Deserialize)]
struct SysDto {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainDto {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ConditionDto {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindDto {
    speed: f64,
}

impl From<WeatherDto> for WeatherReport {
    fn from(dto: WeatherDto) -> Self {
        Self {
            city: dto.name,
            country: dto.sys.and_then(|s| s.country),
            temperature_c: dto.main.temp,
            feels_like_c: dto.main.feels_like,
            humidity: dto.main.humidity,
            description: dto
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            wind_speed_ms: dto.wind.map(|w| w.speed).unwrap_or(0.0),
        }
    }
}

fn parse_weather(body: &[u8]) -> Result<WeatherReport, ProviderError> {
    decode::<WeatherDto>(body, "weather").map(Into::into)
}

/// Weather provider backed by the OpenWeatherMap `data/2.5/weather` endpoint.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    policy: RetryPolicy,
    cache: Arc<dyn Cache>,
}

impl OpenWeatherClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        policy: RetryPolicy,
        cache: Arc<dyn Cache>,
    ) -> Result<Self, reqwest::Error> {
        if api_key.is_none() {
            tracing::warn!("OPENWEATHER_API_KEY not set - weather lookups will be unavailable");
        }
        Ok(Self {
            client: build_client(policy.timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            policy,
            cache,
        })
    }

    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherReport, ProviderError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let body = send_with_retry(
            &self.policy,
            "openweathermap",
            || {
                self.client
                    .get(&url)
                    .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            },
            |status| match status {
                StatusCode::NOT_FOUND => ProviderError::NotFound(format!("city '{city}'")),
                StatusCode::UNAUTHORIZED => {
                    ProviderError::NotConfigured("weather API key was rejected".to_string())
                }
                other => ProviderError::Upstream(format!("weather API returned {other}")),
            },
        )
        .await?;

        parse_weather(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("weather API key is not set".to_string()))?;

        let key = format!("weather:{}", city.trim().to_lowercase());
        read_through(self.cache.as_ref(), &key, CACHE_TTL, || {
            self.fetch(city.trim(), api_key)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;

    const SAMPLE: &str = r#"{
        "coord": {"lon": 139.69, "lat": 35.69},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}],
        "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 64, "pressure": 1013},
        "wind": {"speed": 3.6, "deg": 200},
        "sys": {"country": "JP"},
        "name": "Tokyo",
        "cod": 200
    }"#;

    #[test]
    fn test_parse_weather() {
        let report = parse_weather(SAMPLE.as_bytes()).unwrap();

        assert_eq!(report.city, "Tokyo");
        assert_eq!(report.country.as_deref(), Some("JP"));
        assert_eq!(report.temperature_c, 18.4);
        assert_eq!(report.humidity, 64);
        assert_eq!(report.description, "broken clouds");
        assert_eq!(report.wind_speed_ms, 3.6);
    }

    #[test]
    fn test_parse_weather_tolerates_missing_optional_blocks() {
        let raw = r#"{"name": "Nowhere", "main": {"temp": 1.0, "feels_like": 0.0, "humidity": 10}}"#;
        let report = parse_weather(raw.as_bytes()).unwrap();

        assert!(report.country.is_none());
        assert_eq!(report.description, "");
        assert_eq!(report.wind_speed_ms, 0.0);
    }

    #[test]
    fn test_parse_weather_rejects_garbage() {
        assert!(matches!(
            parse_weather(b"<html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let client = OpenWeatherClient::new(
            DEFAULT_BASE_URL,
            None,
            RetryPolicy::default(),
            Arc::new(InMemoryCache::new()),
        )
        .unwrap();

        assert!(matches!(
            client.current("Paris").await,
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_report_is_served_without_network() {
        let cache = Arc::new(InMemoryCache::new());
        let cached = parse_weather(SAMPLE.as_bytes()).unwrap();
        cache
            .set(
                "weather:tokyo",
                &serde_json::to_string(&cached).unwrap(),
                None,
            )
            .await
            .unwrap();

        // Unroutable base URL: any network call would fail.
        let client = OpenWeatherClient::new(
            "http://127.0.0.1:9",
            Some("key".to_string()),
            RetryPolicy {
                attempts: 1,
                ..RetryPolicy::default()
            },
            cache,
        )
        .unwrap();

        assert_eq!(client.current(" Tokyo ").await.unwrap(), cached);
    }
}
