//! Stateless domain services.

pub mod currency;
pub mod itinerary;
pub mod search;
pub mod travel;

pub use currency::{Conversion, CurrencyConverter, RateSource};
pub use itinerary::{ActivityCatalog, DayTemplate, ItineraryGenerator};
pub use search::{FlightOffer, FlightQuery, HotelOffer, HotelQuery, search_flights, search_hotels};
pub use travel::{Coordinates, TravelMode, TravelOption, TravelPlan, haversine_km, plan_travel_options};
