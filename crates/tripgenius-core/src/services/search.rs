//! Mock flight and hotel listings.
//!
//! There is no real inventory behind these searches. Offers are derived from a
//! hash of the normalized query so the same search always returns the same
//! results, which keeps the frontend and its tests stable.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::travel::round_to;
use crate::error::DomainError;

const FLIGHT_OFFERS: usize = 5;
const HOTEL_OFFERS: usize = 6;
const MAX_PASSENGERS: u32 = 9;
const MAX_GUESTS: u32 = 10;
const MAX_NIGHTS: i64 = 30;
const CURRENCY: &str = "USD";

const CARRIERS: [(&str, &str); 6] = [
    ("SkyLine Air", "SL"),
    ("Aurora Airways", "AU"),
    ("Meridian", "MR"),
    ("BlueJet", "BJ"),
    ("Condor Express", "CX"),
    ("Pacific Crest", "PC"),
];

const HOTEL_PREFIXES: [&str; 6] = ["Grand", "Royal", "Harbor", "Garden", "Central", "Old Town"];
const HOTEL_SUFFIXES: [&str; 6] = ["Hotel", "Suites", "Inn", "Residence", "Lodge", "Boutique Hotel"];
const AMENITIES: [&str; 8] = [
    "Free WiFi",
    "Breakfast included",
    "Pool",
    "Gym",
    "Spa",
    "Airport shuttle",
    "Parking",
    "Pet friendly",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    #[serde(default = "default_party")]
    pub passengers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: u32,
    pub stops: u8,
    pub price_per_passenger: f64,
    pub total_price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelQuery {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_party")]
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    pub id: String,
    pub name: String,
    pub city: String,
    pub rating: f64,
    pub price_per_night: f64,
    pub nights: u32,
    pub rooms: u32,
    pub total_price: f64,
    pub amenities: Vec<String>,
    pub currency: String,
}

fn default_party() -> u32 {
    1
}

/// Small deterministic generator (splitmix64) seeded from the query hash.
struct SeededRng(u64);

impl SeededRng {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform-ish value in `0..bound`.
    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound.max(1)
    }
}

/// 64-bit FNV-1a.
fn fnv1a(input: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    input.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

fn required(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DomainError::validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Generate flight offers for a route and date, cheapest first.
pub fn search_flights(query: &FlightQuery) -> Result<Vec<FlightOffer>, DomainError> {
    let origin = required(&query.origin, "origin")?;
    let destination = required(&query.destination, "destination")?;
    if origin.eq_ignore_ascii_case(&destination) {
        return Err(DomainError::validation(
            "origin and destination must be different",
        ));
    }
    if !(1..=MAX_PASSENGERS).contains(&query.passengers) {
        return Err(DomainError::validation(format!(
            "passengers must be between 1 and {MAX_PASSENGERS}"
        )));
    }

    let route_key = format!(
        "{}|{}",
        origin.to_lowercase(),
        destination.to_lowercase()
    );
    // Route length depends on the route only, prices vary per date.
    let route_minutes = 60 + fnv1a(&route_key) % 571;
    let seed = fnv1a(&format!("{route_key}|{}", query.date));
    let mut rng = SeededRng(seed);

    let mut offers: Vec<FlightOffer> = (0..FLIGHT_OFFERS)
        .map(|index| {
            let (airline, code) = CARRIERS[rng.below(CARRIERS.len() as u64) as usize];
            let stops = rng.below(3) as u8;
            let duration_minutes = (route_minutes + u64::from(stops) * 45) as u32;
            let departure_minute = 5 * 60 + rng.below(17 * 12) * 5;
            let departure = query.date.and_time(NaiveTime::MIN)
                + Duration::minutes(departure_minute as i64);
            let arrival = departure + Duration::minutes(i64::from(duration_minutes));

            let per_passenger = round_to(
                40.0 + route_minutes as f64 * 0.35 + rng.below(80) as f64
                    - f64::from(stops) * 15.0,
                2,
            );

            FlightOffer {
                id: format!("FL-{:016x}", seed.wrapping_add(index as u64)),
                airline: airline.to_string(),
                flight_number: format!("{code}{}", 100 + rng.below(900)),
                origin: origin.clone(),
                destination: destination.clone(),
                departure,
                arrival,
                duration_minutes,
                stops,
                price_per_passenger: per_passenger,
                total_price: round_to(per_passenger * f64::from(query.passengers), 2),
                currency: CURRENCY.to_string(),
            }
        })
        .collect();

    offers.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
    Ok(offers)
}

/// Generate hotel offers for a stay, cheapest first.
pub fn search_hotels(query: &HotelQuery) -> Result<Vec<HotelOffer>, DomainError> {
    let city = required(&query.city, "city")?;
    if query.check_out <= query.check_in {
        return Err(DomainError::validation(
            "check-out must be after check-in",
        ));
    }
    let nights = (query.check_out - query.check_in).num_days();
    if nights > MAX_NIGHTS {
        return Err(DomainError::validation(format!(
            "stays are limited to {MAX_NIGHTS} nights"
        )));
    }
    if !(1..=MAX_GUESTS).contains(&query.guests) {
        return Err(DomainError::validation(format!(
            "guests must be between 1 and {MAX_GUESTS}"
        )));
    }

    let nights = nights as u32;
    let rooms = query.guests.div_ceil(2);
    let seed = fnv1a(&format!(
        "{}|{}|{}",
        city.to_lowercase(),
        query.check_in,
        query.check_out
    ));
    let mut rng = SeededRng(seed);

    let mut offers: Vec<HotelOffer> = (0..HOTEL_OFFERS)
        .map(|index| {
            let prefix = HOTEL_PREFIXES[rng.below(HOTEL_PREFIXES.len() as u64) as usize];
            let suffix = HOTEL_SUFFIXES[index % HOTEL_SUFFIXES.len()];
            let rating = (30 + rng.below(21)) as f64 / 10.0;
            let price_per_night =
                round_to(40.0 + rating * rating * 8.0 + rng.below(60) as f64, 2);

            let amenity_count = 3 + rng.below(3) as usize;
            let start = rng.below(AMENITIES.len() as u64) as usize;
            let amenities = (0..amenity_count)
                .map(|offset| AMENITIES[(start + offset) % AMENITIES.len()].to_string())
                .collect();

            HotelOffer {
                id: format!("HT-{:016x}", seed.wrapping_add(index as u64)),
                name: format!("{prefix} {city} {suffix}"),
                city: city.clone(),
                rating,
                price_per_night,
                nights,
                rooms,
                total_price: round_to(price_per_night * f64::from(nights * rooms), 2),
                amenities,
                currency: CURRENCY.to_string(),
            }
        })
        .collect();

    offers.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flight_query() -> FlightQuery {
        FlightQuery {
            origin: "Berlin".to_string(),
            destination: "Madrid".to_string(),
            date: date(2025, 6, 12),
            passengers: 2,
        }
    }

    fn hotel_query() -> HotelQuery {
        HotelQuery {
            city: "Prague".to_string(),
            check_in: date(2025, 7, 1),
            check_out: date(2025, 7, 4),
            guests: 3,
        }
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_flights_are_deterministic_and_sorted() {
        let first = search_flights(&flight_query()).unwrap();
        let second = search_flights(&flight_query()).unwrap();

        assert_eq!(first.len(), FLIGHT_OFFERS);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].total_price <= w[1].total_price));
    }

    #[test]
    fn test_flight_offer_shape() {
        for offer in search_flights(&flight_query()).unwrap() {
            assert!((60..=720).contains(&offer.duration_minutes));
            assert!(offer.stops <= 2);
            assert_eq!(offer.departure.date(), date(2025, 6, 12));
            assert_eq!(
                (offer.arrival - offer.departure).num_minutes(),
                i64::from(offer.duration_minutes)
            );
            assert!((offer.total_price - offer.price_per_passenger * 2.0).abs() < 0.011);
            assert_eq!(offer.currency, "USD");
        }
    }

    #[test]
    fn test_flight_search_is_case_insensitive() {
        let mut query = flight_query();
        query.origin = " berlin ".to_string();
        query.destination = "MADRID".to_string();

        let a = search_flights(&flight_query()).unwrap();
        let b = search_flights(&query).unwrap();
        assert_eq!(
            a.iter().map(|o| o.total_price).collect::<Vec<_>>(),
            b.iter().map(|o| o.total_price).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_flight_validation() {
        let mut same = flight_query();
        same.destination = "berlin".to_string();
        assert!(search_flights(&same).is_err());

        let mut too_many = flight_query();
        too_many.passengers = 10;
        assert!(search_flights(&too_many).is_err());

        let mut blank = flight_query();
        blank.origin = " ".to_string();
        assert!(search_flights(&blank).is_err());
    }

    #[test]
    fn test_hotels_totals_and_order() {
        let offers = search_hotels(&hotel_query()).unwrap();

        assert_eq!(offers.len(), HOTEL_OFFERS);
        assert!(offers.windows(2).all(|w| w[0].total_price <= w[1].total_price));
        for offer in &offers {
            assert_eq!(offer.nights, 3);
            assert_eq!(offer.rooms, 2);
            assert!((3.0..=5.0).contains(&offer.rating));
            assert!((3..=5).contains(&offer.amenities.len()));
            assert!(offer.name.contains("Prague"));
            let expected = offer.price_per_night * 6.0;
            assert!((offer.total_price - expected).abs() < 0.011);
        }
    }

    #[test]
    fn test_hotel_validation() {
        let mut reversed = hotel_query();
        reversed.check_out = reversed.check_in;
        assert!(search_hotels(&reversed).is_err());

        let mut long = hotel_query();
        long.check_out = date(2025, 9, 1);
        assert!(search_hotels(&long).is_err());

        let mut crowd = hotel_query();
        crowd.guests = 0;
        assert!(search_hotels(&crowd).is_err());
    }
}
