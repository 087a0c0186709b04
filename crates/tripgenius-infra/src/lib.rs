//! # TripGenius Infrastructure
//!
//! Concrete implementations of the ports defined in `tripgenius-core`.
//! This crate contains persistence, cache, auth and third-party API integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `redis` - Redis-backed cache

pub mod auth;
pub mod cache;
pub mod database;
pub mod outbound;
pub mod rate_limit;

// Re-exports - always available
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::{DatabaseConfig, InMemoryTripRepository, InMemoryUserRepository};
pub use outbound::{NominatimGeocoder, OpenExchangeRateClient, OpenWeatherClient, RetryPolicy};
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

// Re-exports - optional backends
#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresTripRepository, PostgresUserRepository};
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
