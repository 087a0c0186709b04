//! Trip CRUD. Every route acts on the caller's own trips.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use tripgenius_core::domain::{Trip, TripDraft, TripPatch};
use tripgenius_core::error::DomainError;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Missing trips are 404; someone else's trip is 403.
async fn load_owned(state: &AppState, id: Uuid, identity: &Identity) -> AppResult<Trip> {
    let trip = state
        .trips
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Trip",
            id,
        })?;

    if let Err(e) = trip.ensure_owned_by(identity.user_id) {
        tracing::warn!(trip_id = %id, caller = %identity.user_id, "Trip access denied");
        return Err(e.into());
    }
    Ok(trip)
}

/// GET /api/trips
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let trips = state.trips.find_by_user_id(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(trips))
}

/// POST /api/trips
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<TripDraft>,
) -> AppResult<HttpResponse> {
    let trip = Trip::create(identity.user_id, body.into_inner())?;
    let trip = state.trips.save(trip).await?;

    tracing::info!(trip_id = %trip.id, user_id = %identity.user_id, "Trip created");
    Ok(HttpResponse::Created().json(trip))
}

/// GET /api/trips/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let trip = load_owned(&state, path.into_inner(), &identity).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/// PUT /api/trips/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<TripPatch>,
) -> AppResult<HttpResponse> {
    let mut trip = load_owned(&state, path.into_inner(), &identity).await?;
    trip.apply(body.into_inner())?;

    let trip = state.trips.update(trip).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/// PATCH /api/trips/{id}/favorite
pub async fn toggle_favorite(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut trip = load_owned(&state, path.into_inner(), &identity).await?;
    trip.toggle_favorite();

    let trip = state.trips.update(trip).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/// DELETE /api/trips/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    load_owned(&state, id, &identity).await?;
    state.trips.delete(id).await?;

    tracing::info!(trip_id = %id, user_id = %identity.user_id, "Trip deleted");
    Ok(HttpResponse::NoContent().finish())
}
