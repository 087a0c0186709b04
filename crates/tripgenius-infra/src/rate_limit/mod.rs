//! Per-client request quotas.

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};
