//! Exchange rates from the open.er-api.com `latest` endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use tripgenius_core::ports::{Cache, ExchangeRateProvider, ProviderError, read_through};

use super::retry::{RetryPolicy, send_with_retry};
use super::{build_client, decode};

pub const DEFAULT_BASE_URL: &str = "https://open.er-api.com";
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct LatestDto {
    result: String,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Rates quoted against one base currency. This is what gets cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

fn parse_latest(base: &str, body: &[u8]) -> Result<RateTable, ProviderError> {
    let dto = decode::<LatestDto>(body, "exchange rates")?;
    if dto.result != "success" {
        return Err(ProviderError::Upstream(format!(
            "exchange rate API answered '{}': {}",
            dto.result,
            dto.error_type.as_deref().unwrap_or("unknown error")
        )));
    }
    Ok(RateTable {
        base: base.to_string(),
        rates: dto.rates,
    })
}

pub struct OpenExchangeRateClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    cache: Arc<dyn Cache>,
}

impl OpenExchangeRateClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        policy: RetryPolicy,
        cache: Arc<dyn Cache>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(policy.timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
            cache,
        })
    }

    async fn fetch_table(&self, base: &str) -> Result<RateTable, ProviderError> {
        let url = format!("{}/v6/latest/{base}", self.base_url);
        let body = send_with_retry(
            &self.policy,
            "exchange-rates",
            || self.client.get(&url),
            |status| ProviderError::Upstream(format!("exchange rate API returned {status}")),
        )
        .await?;

        parse_latest(base, &body)
    }
}

#[async_trait]
impl ExchangeRateProvider for OpenExchangeRateClient {
    async fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        let from = from.to_ascii_uppercase();
        let to = to.to_ascii_uppercase();

        let key = format!("fx:{from}");
        let table: RateTable =
            read_through(self.cache.as_ref(), &key, CACHE_TTL, || self.fetch_table(&from)).await?;

        table
            .rates
            .get(&to)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(format!("no {} rate for {to}", table.base)))
    }
}
