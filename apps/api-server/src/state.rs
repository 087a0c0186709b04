//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;

use tripgenius_core::ports::{
    Cache, Geocoder, PasswordService, RateLimiter, TokenService,
    TripRepository, UserRepository, WeatherProvider,
};
use tripgenius_core::services::{ActivityCatalog, CurrencyConverter, ItineraryGenerator};
use tripgenius_infra::database::DatabaseConfig;
use tripgenius_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryRateLimiter, InMemoryTripRepository,
    InMemoryUserRepository, JwtTokenService, NominatimGeocoder, OpenExchangeRateClient,
    OpenWeatherClient,
};

#[cfg(feature = "postgres")]
use tripgenius_infra::{DatabaseConnections, PostgresTripRepository, PostgresUserRepository};
#[cfg(feature = "redis")]
use tripgenius_infra::{RedisCache, RedisConfig};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub weather: Arc<dyn WeatherProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub currency: CurrencyConverter,
    pub itineraries: Arc<ItineraryGenerator>,
    /// Which persistence backend is live, reported by `/api/health`.
    pub storage: &'static str,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    trips: Arc<dyn TripRepository>,
    storage: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            trips: Arc::new(InMemoryTripRepository::new()),
            storage: "memory",
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Unreachable Postgres or Redis degrade to in-memory backends; a broken
    /// itinerary catalog or HTTP client setup is a startup error.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repos = init_repositories(config.database.as_ref()).await;
        let cache = init_cache(config.redis_url.as_deref()).await;

        let providers = &config.providers;
        let weather = OpenWeatherClient::new(
            providers.openweather_base_url.clone(),
            providers.openweather_api_key.clone(),
            providers.retry.clone(),
            cache.clone(),
        )
        .context("building weather client")?;
        let geocoder = NominatimGeocoder::new(
            providers.nominatim_base_url.clone(),
            providers.retry.clone(),
            cache.clone(),
        )
        .context("building geocoding client")?;
        // Conversion falls back to built-in rates, so the live lookup gets one short try.
        let rates = OpenExchangeRateClient::new(
            providers.exchange_rate_base_url.clone(),
            providers.retry.fail_fast(),
            cache.clone(),
        )
        .context("building exchange rate client")?;

        let catalog = load_catalog(config.itinerary_catalog_path.as_deref())?;

        tracing::info!(storage = repos.storage, "Application state initialized");

        Ok(Self {
            users: repos.users,
            trips: repos.trips,
            cache,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
            weather: Arc::new(weather),
            geocoder: Arc::new(geocoder),
            currency: CurrencyConverter::new(Arc::new(rates)),
            itineraries: Arc::new(ItineraryGenerator::new(catalog)),
            storage: repos.storage,
        })
    }

    /// In-memory state wired to the given third-party providers.
    #[cfg(test)]
    pub fn with_providers(
        weather: Arc<dyn WeatherProvider>,
        geocoder: Arc<dyn Geocoder>,
        rates: Arc<dyn tripgenius_core::ports::ExchangeRateProvider>,
    ) -> Self {
        let repos = Repositories::in_memory();
        Self {
            users: repos.users,
            trips: repos.trips,
            cache: Arc::new(InMemoryCache::new()),
            tokens: Arc::new(JwtTokenService::new(Default::default())),
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(Default::default())),
            weather,
            geocoder,
            currency: CurrencyConverter::new(rates),
            itineraries: Arc::new(ItineraryGenerator::default()),
            storage: repos.storage,
        }
    }
}

#[cfg(feature = "postgres")]
async fn init_repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Repositories::in_memory();
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => Repositories {
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
            trips: Arc::new(PostgresTripRepository::new(connections.main)),
            storage: "postgres",
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            Repositories::in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn init_repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL is set but the postgres feature is disabled");
    }
    tracing::info!("Running without postgres feature - using in-memory repositories");
    Repositories::in_memory()
}

#[cfg(feature = "redis")]
async fn init_cache(redis_url: Option<&str>) -> Arc<dyn Cache> {
    let Some(url) = redis_url else {
        return Arc::new(InMemoryCache::new());
    };

    match RedisCache::new(RedisConfig::from_env(url.to_string())).await {
        Ok(cache) => {
            tracing::info!("Using Redis cache");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to Redis. Using in-memory cache.");
            Arc::new(InMemoryCache::new())
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn init_cache(redis_url: Option<&str>) -> Arc<dyn Cache> {
    if redis_url.is_some() {
        tracing::warn!("REDIS_URL is set but the redis feature is disabled");
    }
    Arc::new(InMemoryCache::new())
}

fn load_catalog(path: Option<&str>) -> anyhow::Result<ActivityCatalog> {
    let Some(path) = path else {
        return Ok(ActivityCatalog::builtin());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading itinerary catalog {path}"))?;
    let catalog = ActivityCatalog::from_json(&raw)
        .with_context(|| format!("parsing itinerary catalog {path}"))?;
    tracing::info!(path, "Loaded itinerary catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_catalog_path_uses_builtin() {
        assert!(load_catalog(None).is_ok());
    }

    #[test]
    fn test_unreadable_catalog_is_an_error() {
        let err = load_catalog(Some("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("reading itinerary catalog"));
    }
}
