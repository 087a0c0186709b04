//! Middleware, extractors and error mapping.

pub mod auth;
pub mod error;
pub mod rate_limit;
