//! Domain entities - the core business objects.

mod itinerary;
mod mood;
mod trip;
mod user;

pub use itinerary::{DayPlan, Itinerary};
pub use mood::Mood;
pub use trip::{Trip, TripDraft, TripPatch};
pub use user::{User, mask_email, normalize_email};
