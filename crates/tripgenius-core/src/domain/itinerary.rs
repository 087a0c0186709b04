use serde::{Deserialize, Serialize};

use super::Mood;

/// One day of a generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number.
    pub day: u32,
    pub theme: String,
    pub activities: Vec<String>,
}

/// Day-by-day activity suggestions for a destination and mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub destination: String,
    pub mood: Mood,
    pub days: Vec<DayPlan>,
}
