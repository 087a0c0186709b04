//! Great-circle distance and rough door-to-door travel estimates.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(DomainError::validation("coordinates must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::validation("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::validation("longitude must be within [-180, 180]"));
        }
        Ok(Self { lat, lon })
    }
}

/// Haversine distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Flight,
    Train,
    Bus,
    Car,
}

/// Per-mode constants used for the estimates.
struct ModeProfile {
    mode: TravelMode,
    speed_kmh: f64,
    overhead_hours: f64,
    cost_per_km: f64,
    base_fare: f64,
    min_km: f64,
    max_km: f64,
}

const PROFILES: [ModeProfile; 4] = [
    ModeProfile {
        mode: TravelMode::Flight,
        speed_kmh: 800.0,
        overhead_hours: 2.5,
        cost_per_km: 0.11,
        base_fare: 50.0,
        min_km: 150.0,
        max_km: f64::INFINITY,
    },
    ModeProfile {
        mode: TravelMode::Train,
        speed_kmh: 120.0,
        overhead_hours: 0.5,
        cost_per_km: 0.09,
        base_fare: 5.0,
        min_km: 0.0,
        max_km: 1500.0,
    },
    ModeProfile {
        mode: TravelMode::Bus,
        speed_kmh: 70.0,
        overhead_hours: 0.25,
        cost_per_km: 0.05,
        base_fare: 2.0,
        min_km: 0.0,
        max_km: 1200.0,
    },
    ModeProfile {
        mode: TravelMode::Car,
        speed_kmh: 80.0,
        overhead_hours: 0.0,
        cost_per_km: 0.12,
        base_fare: 0.0,
        min_km: 0.0,
        max_km: 2500.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelOption {
    pub mode: TravelMode,
    pub duration_hours: f64,
    /// USD.
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub distance_km: f64,
    pub options: Vec<TravelOption>,
}

/// Estimate every mode that makes sense for the distance between two points,
/// fastest first.
pub fn plan_travel_options(from: Coordinates, to: Coordinates) -> TravelPlan {
    let distance = haversine_km(from, to);

    let mut options: Vec<TravelOption> = PROFILES
        .iter()
        .filter(|p| distance >= p.min_km && distance <= p.max_km)
        .map(|p| TravelOption {
            mode: p.mode,
            duration_hours: round_to(distance / p.speed_kmh + p.overhead_hours, 1),
            estimated_cost: round_to(p.base_fare + distance * p.cost_per_km, 2),
        })
        .collect();

    options.sort_by(|a, b| a.duration_hours.total_cmp(&b.duration_hours));

    TravelPlan {
        distance_km: round_to(distance, 1),
        options,
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
