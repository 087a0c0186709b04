use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{Itinerary, Mood};
use crate::error::DomainError;

const MAX_DESTINATION_LEN: usize = 120;
const MAX_MEMBERS: usize = 20;

/// Trip entity - a user-owned travel plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub members: Vec<String>,
    pub mood: Option<Mood>,
    pub itinerary: Option<Itinerary>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub itinerary: Option<Itinerary>,
}

/// Partial update. Absent fields are left untouched; `itinerary: null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub members: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub mood: Option<Option<Mood>>,
    #[serde(default, deserialize_with = "present")]
    pub itinerary: Option<Option<Itinerary>>,
    pub favorite: Option<bool>,
}

/// Distinguishes an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Trip {
    /// Validate a draft and build a new trip owned by `user_id`.
    pub fn create(user_id: Uuid, draft: TripDraft) -> Result<Self, DomainError> {
        let now = Utc::now();
        let mut trip = Self {
            id: Uuid::new_v4(),
            user_id,
            destination: draft.destination,
            start_date: draft.start_date,
            end_date: draft.end_date,
            budget: draft.budget,
            members: draft.members,
            mood: draft.mood,
            itinerary: draft.itinerary,
            favorite: false,
            created_at: now,
            updated_at: now,
        };
        trip.normalize()?;
        Ok(trip)
    }

    /// Apply a partial update. On error the trip is left unchanged.
    pub fn apply(&mut self, patch: TripPatch) -> Result<(), DomainError> {
        let mut next = self.clone();
        if let Some(destination) = patch.destination {
            next.destination = destination;
        }
        if let Some(start_date) = patch.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            next.end_date = end_date;
        }
        if let Some(budget) = patch.budget {
            next.budget = budget;
        }
        if let Some(members) = patch.members {
            next.members = members;
        }
        if let Some(mood) = patch.mood {
            next.mood = mood;
        }
        if let Some(itinerary) = patch.itinerary {
            next.itinerary = itinerary;
        }
        if let Some(favorite) = patch.favorite {
            next.favorite = favorite;
        }
        next.normalize()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }

    pub fn toggle_favorite(&mut self) {
        self.favorite = !self.favorite;
        self.updated_at = Utc::now();
    }

    pub fn ensure_owned_by(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    /// Number of calendar days covered, both ends inclusive.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    fn normalize(&mut self) -> Result<(), DomainError> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(DomainError::validation("destination is required"));
        }
        if destination.chars().count() > MAX_DESTINATION_LEN {
            return Err(DomainError::validation(format!(
                "destination must be at most {MAX_DESTINATION_LEN} characters"
            )));
        }
        self.destination = destination.to_string();

        if self.end_date < self.start_date {
            return Err(DomainError::validation(
                "end date must not be before start date",
            ));
        }

        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(DomainError::validation(
                "budget must be a non-negative number",
            ));
        }

        self.members = normalize_members(&self.members)?;
        Ok(())
    }
}

fn normalize_members(members: &[String]) -> Result<Vec<String>, DomainError> {
    let mut seen = Vec::<String>::with_capacity(members.len());
    let mut result = Vec::with_capacity(members.len());

    for member in members {
        let trimmed = member.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("member names must not be blank"));
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        result.push(trimmed.to_string());
    }

    if result.len() > MAX_MEMBERS {
        return Err(DomainError::validation(format!(
            "a trip can have at most {MAX_MEMBERS} members"
        )));
    }
    Ok(result)
}
