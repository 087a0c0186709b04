//! OpenStreetMap Nominatim geocoding adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use tripgenius_core::ports::{Cache, Geocoder, Place, ProviderError, read_through};
use tripgenius_core::services::Coordinates;

use super::retry::{RetryPolicy, send_with_retry};
use super::{build_client, decode};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Deserialize)]
struct PlaceDto {
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    display_name: String,
    #[serde(default)]
    address: Option<AddressDto>,
}

#[derive(Debug, Deserialize)]
struct AddressDto {
    country: Option<String>,
}

/// Reverse lookups answer `{"error": "..."}` when nothing is there.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseDto {
    Found(PlaceDto),
    Missing { error: String },
}

impl PlaceDto {
    fn into_place(self) -> Result<Place, ProviderError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| ProviderError::Decode(format!("bad latitude '{}': {e}", self.lat)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|e| ProviderError::Decode(format!("bad longitude '{}': {e}", self.lon)))?;
        let coordinates =
            Coordinates::new(lat, lon).map_err(|e| ProviderError::Decode(e.to_string()))?;

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                self.display_name
                    .split(',')
                    .next()
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_default();

        Ok(Place {
            name,
            display_name: self.display_name,
            country: self.address.and_then(|a| a.country),
            coordinates,
        })
    }
}

fn parse_search(body: &[u8]) -> Result<Vec<Place>, ProviderError> {
    decode::<Vec<PlaceDto>>(body, "geocoding search")?
        .into_iter()
        .map(PlaceDto::into_place)
        .collect()
}

fn parse_reverse(body: &[u8]) -> Result<Option<Place>, ProviderError> {
    match decode::<ReverseDto>(body, "reverse geocoding")? {
        ReverseDto::Found(dto) => dto.into_place().map(Some),
        ReverseDto::Missing { error } => {
            tracing::debug!(%error, "Reverse geocoding found nothing");
            Ok(None)
        }
    }
}

/// Geocoder backed by a Nominatim instance.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    cache: Arc<dyn Cache>,
}

impl NominatimGeocoder {
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

    async fn fetch_search(&self, query: &str, limit: usize) -> Result<Vec<Place>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let limit = limit.to_string();
        let body = send_with_retry(
            &self.policy,
            "nominatim",
            || {
                self.client.get(&url).query(&[
                    ("q", query),
                    ("format", "jsonv2"),
                    ("addressdetails", "1"),
                    ("limit", limit.as_str()),
                ])
            },
            |status| ProviderError::Upstream(format!("geocoder returned {status}")),
        )
        .await?;

        parse_search(&body)
    }

    async fn fetch_reverse(&self, at: Coordinates) -> Result<Option<Place>, ProviderError> {
        let url = format!("{}/reverse", self.base_url);
        let (lat, lon) = (at.lat.to_string(), at.lon.to_string());
        let body = send_with_retry(
            &self.policy,
            "nominatim",
            || {
                self.client.get(&url).query(&[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("format", "jsonv2"),
                    ("addressdetails", "1"),
                ])
            },
            |status| ProviderError::Upstream(format!("geocoder returned {status}")),
        )
        .await?;

        parse_reverse(&body)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, ProviderError> {
        let query = query.trim();
        let key = format!("geocode:search:{limit}:{}", query.to_lowercase());
        read_through(self.cache.as_ref(), &key, CACHE_TTL, || {
            self.fetch_search(query, limit)
        })
        .await
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<Place>, ProviderError> {
        // ~100 m buckets keep the cache useful for nearby points.
        let key = format!(
            "geocode:reverse:{:.3}:{:.3}",
            coordinates.lat, coordinates.lon
        );
        read_through(self.cache.as_ref(), &key, CACHE_TTL, || {
            self.fetch_reverse(coordinates)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let raw = r#"[
            {"place_id": 1, "lat": "41.3828939", "lon": "2.1774322", "name": "Barcelona",
             "display_name": "Barcelona, Barcelonès, Catalonia, Spain",
             "address": {"city": "Barcelona", "country": "Spain", "country_code": "es"}},
            {"place_id": 2, "lat": "10.1", "lon": "-64.7", "name": "",
             "display_name": "Barcelona, Anzoátegui, Venezuela"}
        ]"#;

        let places = parse_search(raw.as_bytes()).unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Barcelona");
        assert_eq!(places[0].country.as_deref(), Some("Spain"));
        assert!((places[0].coordinates.lat - 41.3828939).abs() < 1e-9);
        // Blank names fall back to the first display component.
        assert_eq!(places[1].name, "Barcelona");
        assert!(places[1].country.is_none());
    }

    #[test]
    fn test_parse_search_rejects_bad_coordinates() {
        let raw = r#"[{"lat": "north", "lon": "2.0", "display_name": "X"}]"#;
        assert!(matches!(
            parse_search(raw.as_bytes()),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_reverse_found_and_missing() {
        let found = r#"{"lat": "48.8584", "lon": "2.2945", "name": "Tour Eiffel",
                        "display_name": "Tour Eiffel, Paris, France",
                        "address": {"country": "France"}}"#;
        let place = parse_reverse(found.as_bytes()).unwrap().unwrap();
        assert_eq!(place.name, "Tour Eiffel");

        let missing = r#"{"error": "Unable to geocode"}"#;
        assert!(parse_reverse(missing.as_bytes()).unwrap().is_none());
    }
}
