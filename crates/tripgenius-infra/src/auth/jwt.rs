//! HS256 bearer tokens for the TripGenius API.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripgenius_core::ports::{AuthError, TokenClaims, TokenService};

const DEV_SECRET: &str = "tripgenius-dev-secret";
const DEFAULT_ISSUER: &str = "tripgenius-api";
const DEFAULT_TTL_HOURS: i64 = 24;
const LEEWAY_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl: TimeDelta,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            ttl: TimeDelta::hours(DEFAULT_TTL_HOURS),
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Reads `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                if is_production() {
                    tracing::error!("JWT_SECRET is unset in production, tokens are forgeable");
                } else {
                    tracing::warn!("JWT_SECRET is unset, using the development secret");
                }
                defaults.secret
            }
        };

        let ttl = std::env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .map_or(defaults.ttl, TimeDelta::hours);

        Self {
            secret,
            ttl,
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

fn is_production() -> bool {
    std::env::var("RUST_ENV").is_ok_and(|env| matches!(env.as_str(), "production" | "prod"))
}

#[derive(Serialize)]
struct OutgoingClaims<'a> {
    sub: String,
    email: &'a str,
    name: &'a str,
    iss: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct IncomingClaims {
    sub: String,
    email: String,
    #[serde(default)]
    name: String,
    exp: i64,
}

fn token_error(err: JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(err.to_string()),
    }
}

/// Issues and verifies the API's single bearer token type.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = LEEWAY_SECS;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, email: &str, name: &str) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let claims = OutgoingClaims {
            sub: user_id.to_string(),
            email,
            name,
            iss: &self.config.issuer,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.config.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(token_error)
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = decode::<IncomingClaims>(token, &self.decoding_key, &self.validation)
            .map_err(token_error)?
            .claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: claims.email,
            name: claims.name,
            exp: claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.ttl.num_seconds()
    }
}
