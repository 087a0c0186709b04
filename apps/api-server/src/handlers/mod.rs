//! HTTP handlers and route configuration.

mod auth;
mod currency;
mod geocode;
mod health;
mod itinerary;
mod search;
mod travel;
mod trips;
mod weather;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .route("/ai/itinerary", web::post().to(itinerary::generate))
            .route("/weather", web::get().to(weather::current))
            .service(
                web::scope("/search")
                    .route("/flights", web::get().to(search::flights))
                    .route("/hotels", web::get().to(search::hotels)),
            )
            .service(
                web::scope("/trips")
                    .route("", web::get().to(trips::list))
                    .route("", web::post().to(trips::create))
                    .route("/{id}", web::get().to(trips::get))
                    .route("/{id}", web::put().to(trips::update))
                    .route("/{id}", web::delete().to(trips::delete))
                    .route("/{id}/favorite", web::patch().to(trips::toggle_favorite)),
            )
            .route("/currency/convert", web::get().to(currency::convert))
            .service(
                web::scope("/geocode")
                    .route("/search", web::get().to(geocode::search))
                    .route("/reverse", web::get().to(geocode::reverse)),
            )
            .route("/travel/options", web::get().to(travel::options)),
    );
}
