//! Forward and reverse geocoding.

use actix_web::{HttpResponse, web};

use tripgenius_core::services::Coordinates;
use tripgenius_shared::dto::{GeocodeSearchQuery, ReverseGeocodeQuery};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 10;

/// GET /api/geocode/search?q=&limit=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<GeocodeSearchQuery>,
) -> AppResult<HttpResponse> {
    let GeocodeSearchQuery { q, limit } = query.into_inner();

    let q = q.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest("q must not be empty".to_string()));
    }
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let places = state.geocoder.search(q, limit).await?;
    Ok(HttpResponse::Ok().json(places))
}

/// GET /api/geocode/reverse?lat=&lon=
pub async fn reverse(
    state: web::Data<AppState>,
    query: web::Query<ReverseGeocodeQuery>,
) -> AppResult<HttpResponse> {
    let point = Coordinates::new(query.lat, query.lon)?;

    match state.geocoder.reverse(point).await? {
        Some(place) => Ok(HttpResponse::Ok().json(place)),
        None => Err(AppError::NotFound(format!(
            "No place found near {}, {}",
            point.lat, point.lon
        ))),
    }
}
