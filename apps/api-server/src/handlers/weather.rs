//! Current weather proxy.

use actix_web::{HttpResponse, web};

use tripgenius_shared::dto::WeatherQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/weather?city=
pub async fn current(
    state: web::Data<AppState>,
    query: web::Query<WeatherQuery>,
) -> AppResult<HttpResponse> {
    let city = query
        .into_inner()
        .city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("city query parameter is required".to_string()))?;

    let report = state.weather.current(&city).await?;
    Ok(HttpResponse::Ok().json(report))
}
