//! AI itinerary endpoint.

use actix_web::{HttpResponse, web};

use tripgenius_core::domain::Mood;
use tripgenius_shared::dto::ItineraryRequest;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/ai/itinerary
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<ItineraryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mood: Mood = req.mood.parse()?;

    let itinerary = state
        .itineraries
        .generate(&req.destination, mood, req.days)?;

    tracing::debug!(
        destination = %itinerary.destination,
        %mood,
        days = itinerary.days.len(),
        "Generated itinerary"
    );
    Ok(HttpResponse::Ok().json(itinerary))
}
