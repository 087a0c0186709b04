//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire to match the browser client.

use serde::{Deserialize, Serialize};

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Issued token plus the account it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Body of `POST /api/ai/itinerary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub destination: String,
    pub mood: String,
    #[serde(default)]
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyQuery {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeSearchQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseGeocodeQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Travel endpoints, either as coordinates or as place names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelOptionsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_is_camel_case() {
        let body = AuthResponse {
            token: "t".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            user: UserResponse {
                id: "1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                created_at: "2025-01-01T00:00:00Z".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["expiresIn"], 3600);
        assert_eq!(json["user"]["createdAt"], "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_travel_query_accepts_camel_case() {
        let query: TravelOptionsQuery =
            serde_json::from_str(r#"{"fromLat": 1.5, "toLon": -2.0}"#).unwrap();
        assert_eq!(query.from_lat, Some(1.5));
        assert_eq!(query.to_lon, Some(-2.0));
        assert!(query.from.is_none());
    }
}
