//! Mock flight and hotel search.

use actix_web::{HttpResponse, web};

use tripgenius_core::services::{FlightQuery, HotelQuery, search_flights, search_hotels};

use crate::middleware::error::AppResult;

/// GET /api/search/flights?origin=&destination=&date=&passengers=
pub async fn flights(query: web::Query<FlightQuery>) -> AppResult<HttpResponse> {
    let offers = search_flights(&query)?;
    Ok(HttpResponse::Ok().json(offers))
}

/// GET /api/search/hotels?city=&checkIn=&checkOut=&guests=
pub async fn hotels(query: web::Query<HotelQuery>) -> AppResult<HttpResponse> {
    let offers = search_hotels(&query)?;
    Ok(HttpResponse::Ok().json(offers))
}
