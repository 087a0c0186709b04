//! Currency conversion with a fail-open fallback table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::travel::round_to;
use crate::error::DomainError;
use crate::ports::ExchangeRateProvider;

/// Units per US dollar, used whenever the live provider cannot answer.
const FALLBACK_USD_RATES: [(&str, f64); 11] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("INR", 83.0),
    ("JPY", 150.0),
    ("AUD", 1.52),
    ("CAD", 1.36),
    ("CHF", 0.88),
    ("CNY", 7.2),
    ("SGD", 1.34),
    ("AED", 3.67),
];

/// Rate used when a currency is missing from the fallback table.
const FIXED_FALLBACK_RATE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub converted: f64,
    pub source: RateSource,
}

/// Normalize and check an ISO 4217 style code.
pub fn parse_currency_code(code: &str) -> Result<String, DomainError> {
    let trimmed = code.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(DomainError::validation(format!(
            "'{trimmed}' is not a three-letter currency code"
        )))
    }
}

/// Cross rate from the built-in table.
pub fn fallback_rate(from: &str, to: &str) -> f64 {
    let lookup = |code: &str| {
        FALLBACK_USD_RATES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, rate)| *rate)
    };
    match (lookup(from), lookup(to)) {
        (Some(from_per_usd), Some(to_per_usd)) => to_per_usd / from_per_usd,
        _ => FIXED_FALLBACK_RATE,
    }
}

#[derive(Clone)]
pub struct CurrencyConverter {
    provider: Arc<dyn ExchangeRateProvider>,
}

impl CurrencyConverter {
    pub fn new(provider: Arc<dyn ExchangeRateProvider>) -> Self {
        Self { provider }
    }

    /// Convert `amount`. Provider failures never surface to the caller.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, DomainError> {
        let from = parse_currency_code(from)?;
        let to = parse_currency_code(to)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(
                "amount must be a non-negative number",
            ));
        }

        let (rate, source) = if from == to {
            (1.0, RateSource::Live)
        } else {
            match self.provider.rate(&from, &to).await {
                Ok(rate) if rate.is_finite() && rate > 0.0 => (rate, RateSource::Live),
                Ok(rate) => {
                    tracing::warn!(%from, %to, rate, "Provider returned an unusable rate, using fallback");
                    (fallback_rate(&from, &to), RateSource::Fallback)
                }
                Err(e) => {
                    tracing::warn!(%from, %to, error = %e, "Exchange rate lookup failed, using fallback");
                    (fallback_rate(&from, &to), RateSource::Fallback)
                }
            }
        };

        Ok(Conversion {
            converted: round_to(amount * rate, 2),
            from,
            to,
            amount,
            rate,
            source,
        })
    }
}
