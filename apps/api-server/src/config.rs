//! Application configuration loaded from environment variables.

use std::env;

use tripgenius_infra::database::DatabaseConfig;
use tripgenius_infra::outbound::{
    EXCHANGE_RATE_DEFAULT_URL, NOMINATIM_DEFAULT_URL, OPENWEATHER_DEFAULT_URL,
};
use tripgenius_infra::{JwtConfig, RateLimitConfig, RetryPolicy};

/// Third-party endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub nominatim_base_url: String,
    pub exchange_rate_base_url: String,
    pub retry: RetryPolicy,
}

impl ProvidersConfig {
    fn from_env() -> Self {
        Self {
            openweather_api_key: non_empty_var("OPENWEATHER_API_KEY"),
            openweather_base_url: non_empty_var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| OPENWEATHER_DEFAULT_URL.to_string()),
            nominatim_base_url: non_empty_var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|| NOMINATIM_DEFAULT_URL.to_string()),
            exchange_rate_base_url: non_empty_var("EXCHANGE_RATE_BASE_URL")
                .unwrap_or_else(|| EXCHANGE_RATE_DEFAULT_URL.to_string()),
            retry: RetryPolicy::from_env(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub redis_url: Option<String>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub providers: ProvidersConfig,
    /// JSON activity catalog replacing the built-in one.
    pub itinerary_catalog_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            redis_url: non_empty_var("REDIS_URL"),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            providers: ProvidersConfig::from_env(),
            itinerary_catalog_path: non_empty_var("ITINERARY_CATALOG_PATH"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
