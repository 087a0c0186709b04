//! Travel mode estimates between two places.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use tripgenius_core::ports::Geocoder;
use tripgenius_core::services::{Coordinates, TravelPlan, plan_travel_options};
use tripgenius_shared::dto::TravelOptionsQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Resolved place name; absent when coordinates were given directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: Coordinates,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelOptionsResponse {
    pub from: Endpoint,
    pub to: Endpoint,
    #[serde(flatten)]
    pub plan: TravelPlan,
}

fn endpoint_from_coordinates(lat: f64, lon: f64) -> AppResult<Endpoint> {
    Ok(Endpoint {
        name: None,
        coordinates: Coordinates::new(lat, lon)?,
    })
}

async fn resolve(geocoder: &dyn Geocoder, name: &str) -> AppResult<Endpoint> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("place names must not be empty".to_string()));
    }

    let place = geocoder
        .search(name, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Could not locate '{name}'")))?;

    Ok(Endpoint {
        name: Some(place.display_name),
        coordinates: place.coordinates,
    })
}

/// GET /api/travel/options
///
/// Accepts `fromLat`, `fromLon`, `toLat`, `toLon`, or place names in `from`
/// and `to`. Coordinates win when both are supplied.
pub async fn options(
    state: web::Data<AppState>,
    query: web::Query<TravelOptionsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let (from, to) = match query {
        TravelOptionsQuery {
            from_lat: Some(from_lat),
            from_lon: Some(from_lon),
            to_lat: Some(to_lat),
            to_lon: Some(to_lon),
            ..
        } => (
            endpoint_from_coordinates(from_lat, from_lon)?,
            endpoint_from_coordinates(to_lat, to_lon)?,
        ),
        TravelOptionsQuery {
            from: Some(from),
            to: Some(to),
            ..
        } => {
            let geocoder = state.geocoder.as_ref();
            futures::try_join!(resolve(geocoder, &from), resolve(geocoder, &to))?
        }
        _ => {
            return Err(AppError::BadRequest(
                "provide fromLat, fromLon, toLat and toLon, or from and to".to_string(),
            ));
        }
    };

    let plan = plan_travel_options(from.coordinates, to.coordinates);
    Ok(HttpResponse::Ok().json(TravelOptionsResponse { from, to, plan }))
}
